use std::collections::BTreeSet;

use cupcast_league::{Season, TeamCode};
use serde::{Deserialize, Serialize};

use crate::team_feature::{BoxedTeamFeature, FeatureSet};

/// Raw feature values of one team-season, in feature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub team: TeamCode,
    pub season: Season,
    pub values: Vec<f64>,
}

/// Feature vectors of many team-seasons together with the feature set that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub feature_set: FeatureSet,
    pub feature_ids: Vec<String>,
    pub rows: Vec<FeatureVector>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("feature table columns {found:?} do not match its feature set {expected:?}")]
pub struct FeatureColumnMismatch {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

impl FeatureTable {
    #[must_use]
    pub fn new(feature_set: FeatureSet, rows: Vec<FeatureVector>) -> Self {
        let feature_ids = feature_set.feature_ids();
        Self {
            feature_set,
            feature_ids,
            rows,
        }
    }

    /// Rebuilds the features and checks that the stored column ids and row
    /// widths still agree with them.
    pub fn features(&self) -> Result<Vec<BoxedTeamFeature>, FeatureColumnMismatch> {
        let features = self.feature_set.build_features();
        let expected = features
            .iter()
            .map(|f| f.id().to_owned())
            .collect::<Vec<_>>();
        let widths_match = self.rows.iter().all(|r| r.values.len() == expected.len());
        if expected != self.feature_ids || !widths_match {
            return Err(FeatureColumnMismatch {
                expected,
                found: self.feature_ids.clone(),
            });
        }
        Ok(features)
    }

    #[must_use]
    pub fn seasons(&self) -> BTreeSet<Season> {
        self.rows.iter().map(|r| r.season).collect()
    }

    pub fn season_rows(&self, season: Season) -> impl Iterator<Item = &FeatureVector> {
        self.rows.iter().filter(move |r| r.season == season)
    }

    #[must_use]
    pub fn get(&self, team: &TeamCode, season: Season) -> Option<&FeatureVector> {
        self.rows
            .iter()
            .find(|r| r.season == season && &r.team == team)
    }
}
