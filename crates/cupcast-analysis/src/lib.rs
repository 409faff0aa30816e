//! Offline analysis over many team-seasons.
//!
//! This crate turns feature tables and playoff results into the reference
//! data the scorer and calibrator consume, and evaluates finished rankings.
//!
//! # Workflows
//!
//! ## Baseline Construction
//!
//! 1. **Label Samples** ([`sample::LabeledSamples`]): join each feature vector
//!    with its team's playoff result
//! 2. **Build Baselines** ([`baseline::BaselineTable`]): mean and sample
//!    standard deviation of every feature for each result subpopulation
//!
//! ## Ranking Evaluation
//!
//! 1. **Rank Seasons** with a `CompositeScorer` from `cupcast-evaluator`
//! 2. **Evaluate** ([`report::EvaluationReport`]): champion ranks, mean rank
//!    per playoff result and top-k success rates, side by side with the
//!    regular-season standings
//!
//! # Example
//!
//! ```no_run
//! use cupcast_analysis::{baseline::BaselineTable, sample::LabeledSamples};
//! use cupcast_evaluator::feature_table::FeatureTable;
//! use cupcast_league::{PlayoffResults, ResultPopulation};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let table: FeatureTable = todo!();
//! # let results: PlayoffResults = todo!();
//!
//! let labeled = LabeledSamples::new(&table.rows, &results);
//! let baselines = BaselineTable::build(
//!     &table.feature_ids,
//!     &labeled.samples,
//!     &ResultPopulation::standard(),
//! );
//! let finalists = baselines.get(ResultPopulation::AtLeast(3))?;
//! println!("{} finalist team-seasons", finalists.members);
//! # Ok(())
//! # }
//! ```

pub mod baseline;
pub mod report;
pub mod sample;
