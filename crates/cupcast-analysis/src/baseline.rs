//! Baseline statistics per playoff-result subpopulation.
//!
//! A baseline says what a "typical" team of some group looks like: for each
//! feature, the mean and sample (n−1) standard deviation over every
//! team-season in the group. Scoring against the baseline of, say, teams
//! that won at least three rounds measures how close a team is to a
//! finalist profile.
//!
//! # Example
//!
//! ```
//! use cupcast_analysis::{baseline::BaselineTable, sample::LabeledSamples};
//! use cupcast_evaluator::feature_table::FeatureVector;
//! use cupcast_league::{PlayoffResults, ResultPopulation};
//!
//! let rows: Vec<FeatureVector> = vec![];
//! let results = PlayoffResults::default();
//! let labeled = LabeledSamples::new(&rows, &results);
//! let table = BaselineTable::build(&["f_1_3".to_owned()], &labeled.samples, &ResultPopulation::standard());
//! assert_eq!(table.distributions.len(), 9);
//! assert!(table.get(ResultPopulation::All).unwrap().std_dev("f_1_3").is_err());
//! ```

use cupcast_evaluator::baseline::{BaselineDistribution, FeatureBaseline};
use cupcast_league::ResultPopulation;
use cupcast_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::sample::LabeledSample;

/// Baselines of several subpopulations over the same features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTable {
    pub feature_ids: Vec<String>,
    pub distributions: Vec<BaselineDistribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("baseline table has no population '{population}'")]
pub struct MissingPopulation {
    pub population: ResultPopulation,
}

impl BaselineTable {
    /// Computes one distribution per entry of `populations`.
    ///
    /// `feature_ids` must be in the same order as the sample vectors' values.
    #[must_use]
    pub fn build(
        feature_ids: &[String],
        samples: &[LabeledSample<'_>],
        populations: &[ResultPopulation],
    ) -> Self {
        let distributions = populations
            .iter()
            .map(|population| distribution(feature_ids, samples, *population))
            .collect();
        Self {
            feature_ids: feature_ids.to_vec(),
            distributions,
        }
    }

    /// Baseline of `population`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingPopulation`] if the table was built without it.
    pub fn get(
        &self,
        population: ResultPopulation,
    ) -> Result<&BaselineDistribution, MissingPopulation> {
        self.distributions
            .iter()
            .find(|d| d.population == population)
            .ok_or(MissingPopulation { population })
    }
}

fn distribution(
    feature_ids: &[String],
    samples: &[LabeledSample<'_>],
    population: ResultPopulation,
) -> BaselineDistribution {
    let members = samples
        .iter()
        .filter(|s| population.contains(s.result))
        .map(|s| s.vector)
        .collect::<Vec<_>>();
    let features = feature_ids
        .iter()
        .enumerate()
        .map(|(i, feature_id)| {
            let stats = DescriptiveStats::new(members.iter().filter_map(|v| v.values.get(i).copied()));
            FeatureBaseline {
                feature_id: feature_id.clone(),
                mean: stats.as_ref().map(|s| s.mean),
                std_dev: stats.and_then(|s| s.sample_std_dev),
            }
        })
        .collect();
    BaselineDistribution {
        population,
        members: members.len(),
        features,
    }
}

#[cfg(test)]
mod tests {
    use cupcast_evaluator::{baseline::BaselineError, feature_table::FeatureVector};
    use cupcast_league::{PlayoffRecord, PlayoffResult, PlayoffResults, Season, TeamCode};

    use super::*;
    use crate::sample::LabeledSamples;

    fn row(team: &str, values: &[f64]) -> FeatureVector {
        FeatureVector {
            team: TeamCode::new(team),
            season: Season::new(2022),
            values: values.to_vec(),
        }
    }

    fn results(entries: &[(&str, i8)]) -> PlayoffResults {
        PlayoffResults::from_records(entries.iter().map(|(team, result)| PlayoffRecord {
            season: Season::new(2022),
            team: TeamCode::new(*team),
            result: PlayoffResult::try_from(*result).unwrap(),
            standings_rank: None,
        }))
    }

    fn ids() -> Vec<String> {
        vec!["f_1_3".to_owned(), "es_ga_rank".to_owned()]
    }

    #[test]
    fn test_population_membership_and_stats() {
        let rows = [
            row("AAA", &[1.0, 10.0]),
            row("BBB", &[2.0, 8.0]),
            row("CCC", &[3.0, 6.0]),
            row("DDD", &[6.0, 1.0]),
            row("EEE", &[0.0, 20.0]),
        ];
        // EEE missed the playoffs.
        let results = results(&[("AAA", 0), ("BBB", 1), ("CCC", 3), ("DDD", 4)]);
        let labeled = LabeledSamples::new(&rows, &results);
        let table = BaselineTable::build(&ids(), &labeled.samples, &ResultPopulation::standard());

        let all = table.get(ResultPopulation::All).unwrap();
        assert_eq!(all.members, 5);
        assert_eq!(all.get("f_1_3").unwrap().mean, Some(2.4));

        let winners = table.get(ResultPopulation::AtLeast(1)).unwrap();
        assert_eq!(winners.members, 3);
        let f = winners.get("f_1_3").unwrap();
        assert_eq!(f.mean, Some(11.0 / 3.0));
        // values 2, 3, 6: sample variance 13/3
        assert!((f.std_dev.unwrap() - (13.0_f64 / 3.0).sqrt()).abs() < 1e-12);

        assert_eq!(table.get(ResultPopulation::Exactly(0)).unwrap().members, 1);
        assert_eq!(table.get(ResultPopulation::Exactly(2)).unwrap().members, 0);
    }

    #[test]
    fn test_single_member_population_is_undefined() {
        let rows = [row("AAA", &[1.0, 10.0]), row("BBB", &[2.0, 8.0])];
        let results = results(&[("AAA", 4), ("BBB", 2)]);
        let labeled = LabeledSamples::new(&rows, &results);
        let table = BaselineTable::build(&ids(), &labeled.samples, &ResultPopulation::standard());

        let champions = table.get(ResultPopulation::AtLeast(4)).unwrap();
        assert_eq!(champions.members, 1);
        let err = champions.std_dev("f_1_3").unwrap_err();
        assert!(matches!(err, BaselineError::UndefinedBaseline { members: 1, .. }));
        assert!(champions.z_score("es_ga_rank").is_err());

        let empty = table.get(ResultPopulation::Exactly(3)).unwrap();
        assert_eq!(empty.get("f_1_3").unwrap().mean, None);
        assert!(empty.z_score("f_1_3").is_err());
    }

    #[test]
    fn test_unlabeled_seasons_are_skipped() {
        let mut rows = vec![row("AAA", &[1.0, 10.0])];
        rows.push(FeatureVector {
            season: Season::new(2024),
            ..row("BBB", &[2.0, 8.0])
        });
        let results = results(&[("AAA", 4)]);
        let labeled = LabeledSamples::new(&rows, &results);
        assert_eq!(labeled.samples.len(), 1);
        assert!(labeled.unlabeled_seasons.contains(&Season::new(2024)));
    }

    #[test]
    fn test_missing_population() {
        let table = BaselineTable::build(&ids(), &[], &[ResultPopulation::All]);
        assert!(table.get(ResultPopulation::AtLeast(1)).is_err());
    }

    #[test]
    fn test_table_json_round_trip() {
        let rows = [row("AAA", &[1.0, 10.0]), row("BBB", &[2.0, 8.0])];
        let results = results(&[("AAA", 4), ("BBB", 2)]);
        let labeled = LabeledSamples::new(&rows, &results);
        let table = BaselineTable::build(&ids(), &labeled.samples, &ResultPopulation::standard());
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"at-least-4\""));
        let back: BaselineTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.feature_ids, table.feature_ids);
        let populations = |t: &BaselineTable| {
            t.distributions
                .iter()
                .map(|d| (d.population, d.members))
                .collect::<Vec<_>>()
        };
        assert_eq!(populations(&back), populations(&table));
    }
}
