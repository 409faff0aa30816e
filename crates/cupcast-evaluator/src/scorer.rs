//! Composite contender scoring.
//!
//! A team-season's contender score is a weighted sum of its signed z-scores:
//!
//! ```text
//! zᵢ = sᵢ · (xᵢ − μᵢ) / σᵢ
//! score = w₁·z₁ + w₂·z₂ + ... + wₙ·zₙ
//! ```
//!
//! where `μᵢ`, `σᵢ` come from one [`BaselineDistribution`] and `sᵢ` is `-1`
//! for features where lower raw values are better. After the sign flip a
//! higher z-score is always better, so weights are usually non-negative.
//!
//! The score is unbounded; only the ordering of teams within one season is
//! meaningful.

use std::{collections::BTreeMap, iter};

use cupcast_league::{Season, TeamCode};
use cupcast_stats::zscore::ZScore;
use serde::{Deserialize, Serialize};

use crate::{
    baseline::{BaselineDistribution, BaselineError},
    feature_table::{FeatureTable, FeatureVector},
    league_rank::descending_with_team,
    team_feature::{BoxedTeamFeature, TeamFeature as _},
};

/// One weight per feature, keyed by feature id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weights do not match features: missing {missing:?}, unknown {unknown:?}")]
pub struct WeightMismatch {
    pub missing: Vec<String>,
    pub unknown: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ScoreError {
    #[display("{_0}")]
    Baseline(BaselineError),
    #[display("{_0}")]
    WeightMismatch(WeightMismatch),
    #[display("{team} {season}: feature vector has {found} value(s), expected {expected}")]
    VectorWidth {
        team: TeamCode,
        season: Season,
        expected: usize,
        found: usize,
    },
    #[display("{team} {season}: feature '{feature_id}' is not a finite number")]
    NonFinite {
        team: TeamCode,
        season: Season,
        feature_id: String,
    },
}

impl From<BaselineError> for ScoreError {
    fn from(error: BaselineError) -> Self {
        Self::Baseline(error)
    }
}

impl From<WeightMismatch> for ScoreError {
    fn from(error: WeightMismatch) -> Self {
        Self::WeightMismatch(error)
    }
}

impl WeightVector {
    #[must_use]
    pub fn new(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    /// The same weight for every feature.
    pub fn uniform<I, S>(feature_ids: I, weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            weights: feature_ids
                .into_iter()
                .map(|id| (id.into(), weight))
                .collect(),
        }
    }

    /// Pairs `feature_ids` with `values` positionally.
    pub fn from_aligned<'a, I>(feature_ids: I, values: &[f64]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            weights: iter::zip(feature_ids, values)
                .map(|(id, w)| (id.to_owned(), *w))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, feature_id: &str) -> Option<f64> {
        self.weights.get(feature_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(id, w)| (id.as_str(), *w))
    }

    /// Weights in the order of `feature_ids`.
    ///
    /// # Errors
    ///
    /// Fails unless the weight keys are exactly `feature_ids`.
    pub fn aligned<'a, I>(&self, feature_ids: I) -> Result<Vec<f64>, WeightMismatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let feature_ids = feature_ids.into_iter().collect::<Vec<_>>();
        let missing = feature_ids
            .iter()
            .filter(|id| !self.weights.contains_key(**id))
            .map(|id| (*id).to_owned())
            .collect::<Vec<_>>();
        let unknown = self
            .weights
            .keys()
            .filter(|key| !feature_ids.contains(&key.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() || !unknown.is_empty() {
            return Err(WeightMismatch { missing, unknown });
        }
        Ok(feature_ids
            .iter()
            .filter_map(|id| self.weights.get(*id).copied())
            .collect())
    }
}

/// Turns raw feature vectors into signed z-scores against one baseline.
#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    feature_ids: Vec<String>,
    transforms: Vec<(ZScore, f64)>,
}

impl FeatureNormalizer {
    /// # Errors
    ///
    /// Fails if the baseline has no usable standard deviation for any of
    /// `features`.
    pub fn new(
        features: &[BoxedTeamFeature],
        baseline: &BaselineDistribution,
    ) -> Result<Self, BaselineError> {
        let transforms = features
            .iter()
            .map(|f| baseline.z_score(f.id()).map(|z| (z, f.signal().sign())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            feature_ids: features.iter().map(|f| f.id().to_owned()).collect(),
            transforms,
        })
    }

    #[must_use]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Signed z-scores of `vector`, in feature order.
    ///
    /// # Errors
    ///
    /// Fails if `vector` does not have one value per feature, or if any value
    /// is NaN or infinite.
    pub fn normalize(&self, vector: &FeatureVector) -> Result<Vec<f64>, ScoreError> {
        if vector.values.len() != self.transforms.len() {
            return Err(ScoreError::VectorWidth {
                team: vector.team.clone(),
                season: vector.season,
                expected: self.transforms.len(),
                found: vector.values.len(),
            });
        }
        if let Some(i) = vector.values.iter().position(|x| !x.is_finite()) {
            return Err(ScoreError::NonFinite {
                team: vector.team.clone(),
                season: vector.season,
                feature_id: self.feature_ids[i].clone(),
            });
        }
        Ok(iter::zip(&vector.values, &self.transforms)
            .map(|(x, (z, sign))| z.standardize(*x) * sign)
            .collect())
    }
}

/// A team's score and its 1-based rank within the season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTeam {
    pub team: TeamCode,
    pub season: Season,
    pub score: f64,
    pub rank: u32,
}

/// Weighted sum of signed z-scores.
///
/// # Example
///
/// ```
/// use cupcast_evaluator::{
///     baseline::{BaselineDistribution, FeatureBaseline},
///     feature_table::FeatureVector,
///     scorer::{CompositeScorer, WeightVector},
///     team_feature::FeatureSet,
/// };
/// use cupcast_league::{ResultPopulation, Season, TeamCode};
///
/// let features = FeatureSet::lines().build_features();
/// let ids = FeatureSet::lines().feature_ids();
/// let baseline = BaselineDistribution {
///     population: ResultPopulation::All,
///     members: 100,
///     features: ids
///         .iter()
///         .map(|id| FeatureBaseline { feature_id: id.clone(), mean: Some(1.0), std_dev: Some(0.5) })
///         .collect(),
/// };
/// let weights = WeightVector::uniform(ids.iter().cloned(), 1.0);
/// let scorer = CompositeScorer::new(&features, &baseline, &weights).unwrap();
///
/// let vector = FeatureVector {
///     team: TeamCode::new("EDM"),
///     season: Season::new(2023),
///     values: vec![1.0; ids.len()],
/// };
/// assert_eq!(scorer.score(&vector).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    normalizer: FeatureNormalizer,
    weights: Vec<f64>,
}

impl CompositeScorer {
    /// # Errors
    ///
    /// - [`ScoreError::Baseline`] if a feature's standard deviation is
    ///   undefined or zero
    /// - [`ScoreError::WeightMismatch`] if the weight keys differ from the
    ///   feature ids
    pub fn new(
        features: &[BoxedTeamFeature],
        baseline: &BaselineDistribution,
        weights: &WeightVector,
    ) -> Result<Self, ScoreError> {
        let normalizer = FeatureNormalizer::new(features, baseline)?;
        let weights = weights.aligned(normalizer.feature_ids().iter().map(String::as_str))?;
        Ok(Self {
            normalizer,
            weights,
        })
    }

    #[must_use]
    pub fn normalizer(&self) -> &FeatureNormalizer {
        &self.normalizer
    }

    /// # Errors
    ///
    /// Fails if `vector` does not have one value per feature.
    pub fn score(&self, vector: &FeatureVector) -> Result<f64, ScoreError> {
        let z = self.normalizer.normalize(vector)?;
        Ok(iter::zip(z, &self.weights).map(|(z, w)| z * w).sum())
    }

    /// Scores and ranks the team-seasons in `vectors`, best first.
    ///
    /// All vectors are expected to belong to one season; ties are ordered by
    /// team code. A vector that cannot be scored is left out of the ranking
    /// and reported in [`SeasonRanking::failures`].
    pub fn rank_season<'v, I>(&self, vectors: I) -> SeasonRanking
    where
        I: IntoIterator<Item = &'v FeatureVector>,
    {
        let mut ranked = vec![];
        let mut failures = vec![];
        for vector in vectors {
            match self.score(vector) {
                Ok(score) => ranked.push(ScoredTeam {
                    team: vector.team.clone(),
                    season: vector.season,
                    score,
                    rank: 0,
                }),
                Err(error) => failures.push(error),
            }
        }
        ranked.sort_by(|a, b| descending_with_team((a.score, &a.team), (b.score, &b.team)));
        for (team, rank) in iter::zip(&mut ranked, 1..) {
            team.rank = rank;
        }
        SeasonRanking { ranked, failures }
    }

    /// Ranked contender scores of every season in `table`.
    ///
    /// Failing team-seasons are collected; every other team keeps its place.
    pub fn rank_table(&self, table: &FeatureTable) -> RankedTable {
        let mut seasons = BTreeMap::new();
        let mut failures = vec![];
        for season in table.seasons() {
            let ranking = self.rank_season(table.season_rows(season));
            failures.extend(ranking.failures);
            if !ranking.ranked.is_empty() {
                seasons.insert(season, ranking.ranked);
            }
        }
        RankedTable { seasons, failures }
    }
}

/// Ranking of one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRanking {
    pub ranked: Vec<ScoredTeam>,
    pub failures: Vec<ScoreError>,
}

/// Rankings of every season of a feature table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTable {
    pub seasons: BTreeMap<Season, Vec<ScoredTeam>>,
    pub failures: Vec<ScoreError>,
}

#[cfg(test)]
mod tests {
    use cupcast_league::{LeagueTables, ResultPopulation};
    use cupcast_stats::descriptive::DescriptiveStats;

    use super::*;
    use crate::{
        baseline::FeatureBaseline,
        extractor::{
            FeatureExtractor,
            tests::{SEASON, league, roster, team_rows},
        },
        team_feature::FeatureSet,
    };

    fn baseline_of(ids: &[String], rows: &[FeatureVector], members: usize) -> BaselineDistribution {
        let features = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let stats = DescriptiveStats::new(rows.iter().map(|r| r.values[i])).unwrap();
                FeatureBaseline {
                    feature_id: id.clone(),
                    mean: Some(stats.mean),
                    std_dev: stats.sample_std_dev,
                }
            })
            .collect();
        BaselineDistribution {
            population: ResultPopulation::All,
            members,
            features,
        }
    }

    #[test]
    fn test_four_team_season_order() {
        let league = league();
        let teams = [("AAA", 1.0), ("BBB", 2.0), ("CCC", 3.0), ("DDD", 4.0)];
        let mut players = vec![];
        let mut team_splits = vec![];
        for (code, strength) in teams {
            players.extend(roster(code, strength));
            team_splits.extend(team_rows(
                code,
                (150.0 + 10.0 * strength, 200.0 - 10.0 * strength),
                30.0 + 5.0 * strength,
                60.0 - 5.0 * strength,
            ));
        }
        let tables = LeagueTables::new(players, team_splits);
        let extractor = FeatureExtractor::new(&league, FeatureSet::lines());
        let rows = teams
            .iter()
            .map(|(code, _)| {
                extractor
                    .extract(&tables, &TeamCode::new(*code), Season::new(SEASON))
                    .unwrap()
                    .vector
            })
            .collect::<Vec<_>>();

        let ids = extractor.feature_set().feature_ids();
        let baseline = baseline_of(&ids, &rows, rows.len());
        let weights = WeightVector::uniform(ids.iter().cloned(), 1.0);
        let scorer = CompositeScorer::new(extractor.features(), &baseline, &weights).unwrap();
        let SeasonRanking { ranked, failures } = scorer.rank_season(&rows);
        assert!(failures.is_empty());

        let order = ranked.iter().map(|s| s.team.as_str()).collect::<Vec<_>>();
        assert_eq!(order, ["DDD", "CCC", "BBB", "AAA"]);
        assert_eq!(
            ranked.iter().map(|s| s.rank).collect::<Vec<_>>(),
            [1, 2, 3, 4]
        );
        // Scores are centered on the population the baseline was built from.
        let total = ranked.iter().map(|s| s.score).sum::<f64>();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn test_negative_signal_flips_z_score() {
        let features = FeatureSet::lines().build_features();
        let ids = FeatureSet::lines().feature_ids();
        let baseline = BaselineDistribution {
            population: ResultPopulation::All,
            members: 10,
            features: ids
                .iter()
                .map(|id| FeatureBaseline {
                    feature_id: id.clone(),
                    mean: Some(10.0),
                    std_dev: Some(2.0),
                })
                .collect(),
        };
        let normalizer = FeatureNormalizer::new(&features, &baseline).unwrap();
        let vector = FeatureVector {
            team: TeamCode::new("TOR"),
            season: Season::new(SEASON),
            values: vec![14.0; ids.len()],
        };
        let z = normalizer.normalize(&vector).unwrap();
        let at = |id: &str| z[ids.iter().position(|i| i == id).unwrap()];
        assert_eq!(at("f_1_3"), 2.0);
        assert_eq!(at("es_ga_rank"), -2.0);
    }

    #[test]
    fn test_undefined_baseline_is_fatal() {
        let features = FeatureSet::lines().build_features();
        let ids = FeatureSet::lines().feature_ids();
        let baseline = BaselineDistribution {
            population: ResultPopulation::AtLeast(4),
            members: 1,
            features: ids
                .iter()
                .map(|id| FeatureBaseline {
                    feature_id: id.clone(),
                    mean: Some(1.0),
                    std_dev: None,
                })
                .collect(),
        };
        let weights = WeightVector::uniform(ids.iter().cloned(), 1.0);
        let err = CompositeScorer::new(&features, &baseline, &weights).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::Baseline(BaselineError::UndefinedBaseline { members: 1, .. })
        ));

        let mut zero = baseline.clone();
        for f in &mut zero.features {
            f.std_dev = Some(0.0);
        }
        let err = CompositeScorer::new(&features, &zero, &weights).unwrap_err();
        assert!(matches!(err, ScoreError::Baseline(BaselineError::ZeroStdDev { .. })));
    }

    #[test]
    fn test_weight_mismatch() {
        let ids = FeatureSet::lines().feature_ids();
        let mut weights = WeightVector::uniform(ids.iter().skip(1).cloned(), 1.0);
        weights.weights.insert("corsi".to_owned(), 1.0);
        let err = weights.aligned(ids.iter().map(String::as_str)).unwrap_err();
        assert_eq!(err.missing, ["f_1_3"]);
        assert_eq!(err.unknown, ["corsi"]);
    }

    #[test]
    fn test_unscorable_rows_are_skipped() {
        let features = FeatureSet::lines().build_features();
        let ids = FeatureSet::lines().feature_ids();
        let baseline = BaselineDistribution {
            population: ResultPopulation::All,
            members: 10,
            features: ids
                .iter()
                .map(|id| FeatureBaseline {
                    feature_id: id.clone(),
                    mean: Some(10.0),
                    std_dev: Some(2.0),
                })
                .collect(),
        };
        let weights = WeightVector::uniform(ids.iter().cloned(), 1.0);
        let scorer = CompositeScorer::new(&features, &baseline, &weights).unwrap();

        let row = |team: &str, season: u16, values: Vec<f64>| FeatureVector {
            team: TeamCode::new(team),
            season: Season::new(season),
            values,
        };
        let mut nan = vec![10.0; ids.len()];
        nan[0] = f64::NAN;
        let table = FeatureTable::new(
            FeatureSet::lines(),
            vec![
                row("AAA", 2022, vec![10.0; ids.len()]),
                row("BBB", 2022, vec![10.0; 3]),
                row("DDD", 2022, nan),
                row("CCC", 2023, vec![12.0; ids.len()]),
            ],
        );

        let RankedTable { seasons, failures } = scorer.rank_table(&table);
        let teams = seasons
            .iter()
            .map(|(season, ranked)| {
                let codes = ranked.iter().map(|s| s.team.as_str()).collect::<Vec<_>>();
                (season.start_year(), codes)
            })
            .collect::<Vec<_>>();
        assert_eq!(teams, [(2022, vec!["AAA"]), (2023, vec!["CCC"])]);
        assert_eq!(seasons[&Season::new(2022)][0].rank, 1);

        assert_eq!(failures.len(), 2);
        assert!(matches!(
            &failures[0],
            ScoreError::VectorWidth { team, expected, found: 3, .. }
                if team.as_str() == "BBB" && *expected == ids.len()
        ));
        assert!(matches!(
            &failures[1],
            ScoreError::NonFinite { team, feature_id, .. }
                if team.as_str() == "DDD" && feature_id == &ids[0]
        ));
    }

    #[test]
    fn test_weights_serialize_as_map() {
        let weights = WeightVector::from_aligned(["f_1_3", "d_1_2"], &[5.0, 8.5]);
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"d_1_2":8.5,"f_1_3":5.0}"#);
    }
}
