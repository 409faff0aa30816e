//! Team features for contender scoring.
//!
//! A feature reads one number from a [`TeamProfile`]. Features are grouped
//! by what they measure:
//!
//! **Roster tiers** ([`source::TierGameScore`]) - games-weighted game score of
//! a usage window of forwards or defensemen, e.g. `f_1_3` (top line) or
//! `d_5_6` (third pair).
//!
//! **Goaltending** ([`source::StartingGoalieGsax`]) - goals saved above
//! expected by the starting goalie, as a season total or per game.
//!
//! **Team play** ([`source::TeamStatistic`]) - 5v5 goals for/against,
//! power-play goals for and penalty-kill goals against, either as a league
//! rank or as a season-length-adjusted total.
//!
//! **Stars** ([`source::StarCount`]) - how many league-leading skaters are in
//! the tier pool.
//!
//! Which features exist is decided entirely by a [`FeatureSet`]. The scorer
//! relies on features coming back in the order [`FeatureSet::build_features`]
//! returns them.

use std::{fmt, ops::Range};

use serde::{Deserialize, Serialize};

use crate::profile::TeamProfile;

pub use self::source::{StarCount, StarKind, StartingGoalieGsax, TeamStat, TeamStatistic, TierGameScore};

pub mod source;

/// Whether higher raw values mean a stronger team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSignal {
    Positive,
    Negative,
}

impl FeatureSignal {
    /// Multiplier that turns a z-score into a "higher is better" value.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

pub trait TeamFeature: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn signal(&self) -> FeatureSignal;
    #[must_use]
    fn clone_boxed(&self) -> BoxedTeamFeature;
    #[must_use]
    fn extract_raw(&self, profile: &TeamProfile) -> f64;
}

pub type BoxedTeamFeature = Box<dyn TeamFeature>;

impl Clone for BoxedTeamFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl TeamFeature for BoxedTeamFeature {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn signal(&self) -> FeatureSignal {
        self.as_ref().signal()
    }

    fn clone_boxed(&self) -> BoxedTeamFeature {
        self.as_ref().clone_boxed()
    }

    fn extract_raw(&self, profile: &TeamProfile) -> f64 {
        self.as_ref().extract_raw(profile)
    }
}

/// Skater group a roster tier is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkaterGroup {
    Forward,
    Defense,
}

impl SkaterGroup {
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Forward => "f",
            Self::Defense => "d",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Forward => "Forwards",
            Self::Defense => "Defense",
        }
    }
}

/// Sizes of consecutive usage windows, most-used first.
///
/// The tier pool is the sum of the window sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierLayout {
    pub windows: Vec<usize>,
}

impl TierLayout {
    #[must_use]
    pub fn new(windows: impl Into<Vec<usize>>) -> Self {
        Self {
            windows: windows.into(),
        }
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.windows.iter().sum()
    }

    /// Index ranges of the windows within the usage-sorted pool.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.windows.iter().scan(0, |start, len| {
            let range = *start..*start + len;
            *start += len;
            Some(range)
        })
    }

    /// Feature id of a window, 1-based and inclusive: `f_4_6`.
    #[must_use]
    pub fn tier_id(group: SkaterGroup, range: &Range<usize>) -> String {
        format!("{}_{}_{}", group.id_prefix(), range.start + 1, range.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalieMetric {
    Total,
    PerGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamMetricMode {
    /// 1-based league rank; rank 1 is best.
    Rank,
    /// Goal totals scaled to a full-length season.
    AdjustedGoals,
}

/// Complete description of the features a table contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub forward_tiers: TierLayout,
    pub defense_tiers: TierLayout,
    pub goalie: GoalieMetric,
    pub team_metrics: TeamMetricMode,
    #[serde(default)]
    pub star_counts: bool,
}

impl FeatureSet {
    /// Four forward lines, three defense pairs, per-game goaltending and
    /// league ranks.
    #[must_use]
    pub fn lines() -> Self {
        Self {
            forward_tiers: TierLayout::new([3, 3, 3, 3]),
            defense_tiers: TierLayout::new([2, 2, 2]),
            goalie: GoalieMetric::PerGame,
            team_metrics: TeamMetricMode::Rank,
            star_counts: false,
        }
    }

    /// Top and bottom halves of each skater group, total goaltending and
    /// adjusted goal totals.
    #[must_use]
    pub fn halves() -> Self {
        Self {
            forward_tiers: TierLayout::new([6, 6]),
            defense_tiers: TierLayout::new([3, 3]),
            goalie: GoalieMetric::Total,
            team_metrics: TeamMetricMode::AdjustedGoals,
            star_counts: false,
        }
    }

    #[must_use]
    pub fn with_star_counts(mut self, star_counts: bool) -> Self {
        self.star_counts = star_counts;
        self
    }

    #[must_use]
    pub fn tiers(&self, group: SkaterGroup) -> &TierLayout {
        match group {
            SkaterGroup::Forward => &self.forward_tiers,
            SkaterGroup::Defense => &self.defense_tiers,
        }
    }

    #[must_use]
    pub fn build_features(&self) -> Vec<BoxedTeamFeature> {
        let mut features: Vec<BoxedTeamFeature> = vec![];
        for group in [SkaterGroup::Forward, SkaterGroup::Defense] {
            for (index, range) in self.tiers(group).ranges().enumerate() {
                features.push(Box::new(TierGameScore::new(group, index, &range)));
            }
        }
        features.push(Box::new(StartingGoalieGsax::new(self.goalie)));
        for stat in TeamStat::ALL {
            features.push(Box::new(TeamStatistic::new(stat, self.team_metrics)));
        }
        if self.star_counts {
            for kind in StarKind::ALL {
                features.push(Box::new(StarCount::new(kind)));
            }
        }
        features
    }

    #[must_use]
    pub fn feature_ids(&self) -> Vec<String> {
        self.build_features()
            .iter()
            .map(|f| f.id().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_feature_ids() {
        let ids = FeatureSet::lines().feature_ids();
        assert_eq!(
            ids,
            [
                "f_1_3",
                "f_4_6",
                "f_7_9",
                "f_10_12",
                "d_1_2",
                "d_3_4",
                "d_5_6",
                "goalie_gsax_per_gp",
                "es_gf_rank",
                "es_ga_rank",
                "pp_gf_rank",
                "pk_ga_rank",
            ]
        );
    }

    #[test]
    fn test_halves_with_stars() {
        let features = FeatureSet::halves().with_star_counts(true).build_features();
        let ids = features.iter().map(|f| f.id()).collect::<Vec<_>>();
        assert_eq!(ids[..4], ["f_1_6", "f_7_12", "d_1_3", "d_4_6"]);
        assert!(ids.contains(&"goalie_gsax"));
        assert!(ids.contains(&"pk_ga"));
        assert_eq!(ids.last(), Some(&"star_d"));

        let es_ga = features.iter().find(|f| f.id() == "es_ga").unwrap();
        assert_eq!(es_ga.signal(), FeatureSignal::Negative);
        let pp_gf = features.iter().find(|f| f.id() == "pp_gf").unwrap();
        assert_eq!(pp_gf.signal(), FeatureSignal::Positive);
    }

    #[test]
    fn test_ranks_are_negative_signal() {
        let features = FeatureSet::lines().build_features();
        for feature in features.iter().filter(|f| f.id().ends_with("_rank")) {
            assert_eq!(feature.signal(), FeatureSignal::Negative, "{}", feature.id());
        }
    }

    #[test]
    fn test_tier_layout_ranges() {
        let layout = TierLayout::new([3, 3, 3, 3]);
        let ranges = layout.ranges().collect::<Vec<_>>();
        assert_eq!(ranges, [0..3, 3..6, 6..9, 9..12]);
        assert_eq!(layout.pool_size(), 12);
        assert_eq!(TierLayout::tier_id(SkaterGroup::Defense, &(4..6)), "d_5_6");
    }
}
