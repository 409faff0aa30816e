use std::path::Path;

use chrono::{DateTime, Utc};
use cupcast_evaluator::{scorer::WeightVector, team_feature::FeatureSet};
use cupcast_league::ResultPopulation;
use cupcast_training::objective::ObjectiveBreakdown;
use serde::{Deserialize, Serialize};

use crate::util;

/// Calibrated weights together with everything needed to reuse them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub feature_set: FeatureSet,
    /// Baseline the weights were calibrated against.
    pub population: ResultPopulation,
    pub fitness: f64,
    pub objective: ObjectiveBreakdown,
    pub trials: usize,
    pub converged: bool,
    pub weights: WeightVector,
}

impl ScoringModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("scoring model", path)
    }
}
