//! Weight calibration against historical playoff results.
//!
//! The calibrator searches for the feature weights whose contender scores
//! best predict which playoff qualifiers went deep. Every candidate weight
//! vector is a *trial*: the qualifiers of every season are ranked by
//! `Σ zᵢ·wᵢ` and the ranking is graded by the [`objective`].
//!
//! # How Calibration Works
//!
//! 1. **Dataset** - Qualifier feature vectors are standardized once against a
//!    chosen baseline ([`dataset::CalibrationDataset`])
//! 2. **Proposals** - Candidate weight vectors are drawn from a seeded PCG
//!    generator within per-feature [`weights::WeightBounds`]
//! 3. **Evaluation** - Trials are graded in parallel on scoped threads
//! 4. **Selection** - The best objective wins; ties go to the earliest trial
//!
//! # Architecture
//!
//! ```text
//! FeatureTable + PlayoffResults + BaselineDistribution
//!     ↓ standardized by
//! CalibrationDataset (signed z-scores of qualifiers)
//!     ↓ graded by
//! Objective (champion hits, finalists, semifinalists, round winners)
//!     ↑ proposals from
//! Search strategy (random or genetic)
//!     ↓ produces
//! CalibrationOutcome (best weights + breakdown + convergence flag)
//! ```
//!
//! # Search Strategies
//!
//! - **Random** - independent uniform samples within the bounds
//! - **Genetic** - elitism, tournament selection, BLX-α crossover and
//!   Gaussian mutation, all clamped to the bounds (see [`genetic`])
//!
//! Both spend exactly the configured trial budget. Proposals are generated
//! sequentially from the seed and only their evaluation is parallel, so a
//! fixed seed and budget always produce the same result.
//!
//! # Current Limitations
//!
//! - **Single objective**: the nested weighting of champion hits over
//!   finalists over semifinalists is fixed.
//! - **In-sample only**: the search grades weights on the same seasons it
//!   was given; hold-out validation is left to the caller.

pub mod dataset;
pub mod genetic;
pub mod objective;
pub mod search;
pub mod weights;
