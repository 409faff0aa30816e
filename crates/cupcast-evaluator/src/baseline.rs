use cupcast_league::ResultPopulation;
use cupcast_stats::zscore::ZScore;
use serde::{Deserialize, Serialize};

/// Per-feature mean and sample standard deviation over one subpopulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineDistribution {
    pub population: ResultPopulation,
    pub members: usize,
    pub features: Vec<FeatureBaseline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBaseline {
    pub feature_id: String,
    /// `None` for an empty subpopulation.
    pub mean: Option<f64>,
    /// `None` when the subpopulation has fewer than two members.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BaselineError {
    #[display(
        "baseline '{population}' is undefined for '{feature_id}': {members} member(s), at least 2 required"
    )]
    UndefinedBaseline {
        population: ResultPopulation,
        feature_id: String,
        members: usize,
    },
    #[display("baseline '{population}' has zero spread for '{feature_id}'")]
    ZeroStdDev {
        population: ResultPopulation,
        feature_id: String,
    },
    #[display("baseline '{population}' has no entry for feature '{feature_id}'")]
    MissingFeature {
        population: ResultPopulation,
        feature_id: String,
    },
}

impl BaselineDistribution {
    #[must_use]
    pub fn get(&self, feature_id: &str) -> Option<&FeatureBaseline> {
        self.features.iter().find(|f| f.feature_id == feature_id)
    }

    /// Standard deviation of `feature_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BaselineError::UndefinedBaseline`] for a subpopulation with
    /// fewer than two members.
    pub fn std_dev(&self, feature_id: &str) -> Result<f64, BaselineError> {
        self.feature(feature_id)?
            .std_dev
            .ok_or_else(|| BaselineError::UndefinedBaseline {
                population: self.population,
                feature_id: feature_id.to_owned(),
                members: self.members,
            })
    }

    /// Z-score transform of `feature_id`.
    ///
    /// # Errors
    ///
    /// Fails if the feature is missing, its standard deviation is undefined,
    /// or it is zero.
    pub fn z_score(&self, feature_id: &str) -> Result<ZScore, BaselineError> {
        let std_dev = self.std_dev(feature_id)?;
        let mean = self.feature(feature_id)?.mean.ok_or_else(|| {
            BaselineError::UndefinedBaseline {
                population: self.population,
                feature_id: feature_id.to_owned(),
                members: self.members,
            }
        })?;
        ZScore::new(mean, std_dev).map_err(|_| BaselineError::ZeroStdDev {
            population: self.population,
            feature_id: feature_id.to_owned(),
        })
    }

    fn feature(&self, feature_id: &str) -> Result<&FeatureBaseline, BaselineError> {
        self.get(feature_id)
            .ok_or_else(|| BaselineError::MissingFeature {
                population: self.population,
                feature_id: feature_id.to_owned(),
            })
    }
}
