//! Feature vectors joined with their playoff outcome.

use std::collections::BTreeSet;

use cupcast_evaluator::feature_table::FeatureVector;
use cupcast_league::{PlayoffResult, PlayoffResults, Season};

/// A team-season's feature vector and what the team did in the playoffs.
#[derive(Debug, Clone, Copy)]
pub struct LabeledSample<'a> {
    pub vector: &'a FeatureVector,
    pub result: PlayoffResult,
}

#[derive(Debug, Clone, Default)]
pub struct LabeledSamples<'a> {
    pub samples: Vec<LabeledSample<'a>>,
    /// Seasons of `rows` that the playoff table does not cover.
    pub unlabeled_seasons: BTreeSet<Season>,
}

impl<'a> LabeledSamples<'a> {
    /// Labels every row whose season appears in `results`.
    ///
    /// A team missing from a covered season did not qualify; rows of seasons
    /// that are not covered at all are left out and their seasons recorded.
    #[must_use]
    pub fn new<I>(rows: I, results: &PlayoffResults) -> Self
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut labeled = Self::default();
        for vector in rows {
            match results.result(vector.season, &vector.team) {
                Ok(result) => labeled.samples.push(LabeledSample { vector, result }),
                Err(_) => {
                    labeled.unlabeled_seasons.insert(vector.season);
                }
            }
        }
        labeled
    }

    #[must_use]
    pub fn seasons(&self) -> BTreeSet<Season> {
        self.samples.iter().map(|s| s.vector.season).collect()
    }
}
