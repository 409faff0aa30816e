//! Standardized calibration data.
//!
//! Calibration evaluates thousands of weight vectors over the same seasons.
//! The z-score transform does not depend on the weights, so every qualifier's
//! feature vector is standardized once up front and trials only compute dot
//! products.

use std::collections::BTreeMap;

use cupcast_analysis::sample::LabeledSample;
use cupcast_evaluator::scorer::{FeatureNormalizer, ScoreError};
use cupcast_league::{PlayoffResult, Season, TeamCode};

/// Playoff qualifiers of one season with their signed z-scores.
///
/// Teams are kept in team-code order so that equal scores rank
/// alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSamples {
    pub season: Season,
    pub teams: Vec<TeamCode>,
    pub results: Vec<PlayoffResult>,
    pub z_scores: Vec<Vec<f64>>,
}

impl SeasonSamples {
    /// Keeps the qualifiers among `entries`.
    #[must_use]
    pub fn new(season: Season, mut entries: Vec<(TeamCode, PlayoffResult, Vec<f64>)>) -> Self {
        entries.retain(|(_, result, _)| result.qualified());
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut samples = Self {
            season,
            teams: Vec::with_capacity(entries.len()),
            results: Vec::with_capacity(entries.len()),
            z_scores: Vec::with_capacity(entries.len()),
        };
        for (team, result, z) in entries {
            samples.teams.push(team);
            samples.results.push(result);
            samples.z_scores.push(z);
        }
        samples
    }

    #[must_use]
    pub fn has_champion(&self) -> bool {
        self.results.iter().any(|r| r.is_champion())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("calibration dataset has no playoff qualifiers")]
    Empty,
    #[display("calibration dataset has no champion in any season")]
    NoChampion,
    #[display("{team} {season}: {found} z-score(s), expected {expected}")]
    Width {
        team: TeamCode,
        season: Season,
        expected: usize,
        found: usize,
    },
    #[display("{_0}")]
    Score(ScoreError),
}

impl From<ScoreError> for DatasetError {
    fn from(error: ScoreError) -> Self {
        Self::Score(error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationDataset {
    feature_ids: Vec<String>,
    seasons: Vec<SeasonSamples>,
}

impl CalibrationDataset {
    /// Standardizes the qualifier samples with `normalizer`.
    ///
    /// # Errors
    ///
    /// Fails if a vector has the wrong width, no qualifier remains, or no
    /// season has a champion.
    pub fn new(
        samples: &[LabeledSample<'_>],
        normalizer: &FeatureNormalizer,
    ) -> Result<Self, DatasetError> {
        let mut by_season = BTreeMap::<Season, Vec<_>>::new();
        for sample in samples.iter().filter(|s| s.result.qualified()) {
            let z = normalizer.normalize(sample.vector)?;
            by_season
                .entry(sample.vector.season)
                .or_default()
                .push((sample.vector.team.clone(), sample.result, z));
        }
        let seasons = by_season
            .into_iter()
            .map(|(season, entries)| SeasonSamples::new(season, entries))
            .collect();
        Self::from_seasons(normalizer.feature_ids().to_vec(), seasons)
    }

    /// Builds a dataset from already standardized seasons.
    ///
    /// # Errors
    ///
    /// Same as [`CalibrationDataset::new`].
    pub fn from_seasons(
        feature_ids: Vec<String>,
        mut seasons: Vec<SeasonSamples>,
    ) -> Result<Self, DatasetError> {
        seasons.retain(|s| !s.teams.is_empty());
        if seasons.is_empty() {
            return Err(DatasetError::Empty);
        }
        for season in &seasons {
            for (team, z) in season.teams.iter().zip(&season.z_scores) {
                if z.len() != feature_ids.len() {
                    return Err(DatasetError::Width {
                        team: team.clone(),
                        season: season.season,
                        expected: feature_ids.len(),
                        found: z.len(),
                    });
                }
            }
        }
        if !seasons.iter().any(SeasonSamples::has_champion) {
            return Err(DatasetError::NoChampion);
        }
        Ok(Self {
            feature_ids,
            seasons,
        })
    }

    #[must_use]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    #[must_use]
    pub fn seasons(&self) -> &[SeasonSamples] {
        &self.seasons
    }
}

#[cfg(test)]
mod tests {
    use cupcast_evaluator::{
        baseline::{BaselineDistribution, FeatureBaseline},
        feature_table::FeatureVector,
        team_feature::{FeatureSet, TeamFeature as _},
    };
    use cupcast_league::ResultPopulation;

    use super::*;

    fn result(rounds: i8) -> PlayoffResult {
        PlayoffResult::try_from(rounds).unwrap()
    }

    fn entry(team: &str, rounds: i8, z: &[f64]) -> (TeamCode, PlayoffResult, Vec<f64>) {
        (TeamCode::new(team), result(rounds), z.to_vec())
    }

    #[test]
    fn test_season_keeps_qualifiers_in_code_order() {
        let season = SeasonSamples::new(
            Season::new(2022),
            vec![
                entry("TOR", 1, &[0.0]),
                entry("ARI", -1, &[9.0]),
                entry("BOS", 4, &[1.0]),
            ],
        );
        assert_eq!(season.teams, [TeamCode::new("BOS"), TeamCode::new("TOR")]);
        assert_eq!(season.z_scores, [vec![1.0], vec![0.0]]);
        assert!(season.has_champion());
    }

    #[test]
    fn test_dataset_errors() {
        let ids = vec!["f_1_3".to_owned()];
        assert_eq!(
            CalibrationDataset::from_seasons(ids.clone(), vec![]),
            Err(DatasetError::Empty)
        );

        let no_champion = SeasonSamples::new(Season::new(2022), vec![entry("BOS", 3, &[1.0])]);
        assert_eq!(
            CalibrationDataset::from_seasons(ids.clone(), vec![no_champion]),
            Err(DatasetError::NoChampion)
        );

        let wide = SeasonSamples::new(Season::new(2022), vec![entry("BOS", 4, &[1.0, 2.0])]);
        assert!(matches!(
            CalibrationDataset::from_seasons(ids, vec![wide]),
            Err(DatasetError::Width { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_standardizes_against_baseline() {
        let features = FeatureSet::lines().build_features();
        let baseline = BaselineDistribution {
            population: ResultPopulation::All,
            members: 10,
            features: features
                .iter()
                .map(|f| FeatureBaseline {
                    feature_id: f.id().to_owned(),
                    mean: Some(1.0),
                    std_dev: Some(2.0),
                })
                .collect(),
        };
        let normalizer = FeatureNormalizer::new(&features, &baseline).unwrap();
        let width = features.len();
        let rows = [
            FeatureVector {
                team: TeamCode::new("BOS"),
                season: Season::new(2022),
                values: vec![5.0; width],
            },
            FeatureVector {
                team: TeamCode::new("MTL"),
                season: Season::new(2022),
                values: vec![0.0; width],
            },
        ];
        let samples = [
            LabeledSample {
                vector: &rows[0],
                result: result(4),
            },
            LabeledSample {
                vector: &rows[1],
                result: PlayoffResult::DidNotQualify,
            },
        ];
        let dataset = CalibrationDataset::new(&samples, &normalizer).unwrap();
        assert_eq!(dataset.feature_ids().len(), width);
        let season = &dataset.seasons()[0];
        assert_eq!(season.teams, [TeamCode::new("BOS")]);
        // f_1_3 is a positive feature: (5 - 1) / 2
        assert!((season.z_scores[0][0] - 2.0).abs() < 1e-12);
    }
}
