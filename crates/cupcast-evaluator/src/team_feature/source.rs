//! Concrete [`TeamFeature`] implementations.

use std::ops::Range;

use super::{BoxedTeamFeature, FeatureSignal, GoalieMetric, SkaterGroup, TeamFeature, TeamMetricMode, TierLayout};
use crate::profile::TeamProfile;

/// Games-weighted game score of one roster window.
///
/// # Raw measurement
///
/// `raw = Σ(game_score_i × games_i) / Σ(games_i)` over the window members.
#[derive(Debug, Clone)]
pub struct TierGameScore {
    group: SkaterGroup,
    index: usize,
    id: String,
    name: String,
}

impl TierGameScore {
    #[must_use]
    pub fn new(group: SkaterGroup, index: usize, range: &Range<usize>) -> Self {
        Self {
            group,
            index,
            id: TierLayout::tier_id(group, range),
            name: format!("{} {}-{}", group.label(), range.start + 1, range.end),
        }
    }
}

impl TeamFeature for TierGameScore {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn signal(&self) -> FeatureSignal {
        FeatureSignal::Positive
    }
    fn clone_boxed(&self) -> BoxedTeamFeature {
        Box::new(self.clone())
    }
    fn extract_raw(&self, profile: &TeamProfile) -> f64 {
        let tiers = match self.group {
            SkaterGroup::Forward => &profile.forward_tiers,
            SkaterGroup::Defense => &profile.defense_tiers,
        };
        tiers[self.index].game_score
    }
}

/// Goals saved above expected by the goalie with the most games played.
#[derive(Debug, Clone)]
pub struct StartingGoalieGsax {
    metric: GoalieMetric,
}

impl StartingGoalieGsax {
    #[must_use]
    pub fn new(metric: GoalieMetric) -> Self {
        Self { metric }
    }
}

impl TeamFeature for StartingGoalieGsax {
    fn id(&self) -> &'static str {
        match self.metric {
            GoalieMetric::Total => "goalie_gsax",
            GoalieMetric::PerGame => "goalie_gsax_per_gp",
        }
    }
    fn name(&self) -> &'static str {
        match self.metric {
            GoalieMetric::Total => "Starting Goalie GSAx",
            GoalieMetric::PerGame => "Starting Goalie GSAx per Game",
        }
    }
    fn signal(&self) -> FeatureSignal {
        FeatureSignal::Positive
    }
    fn clone_boxed(&self) -> BoxedTeamFeature {
        Box::new(self.clone())
    }
    fn extract_raw(&self, profile: &TeamProfile) -> f64 {
        let goalie = &profile.starting_goalie;
        match self.metric {
            GoalieMetric::Total => goalie.goals_saved_above_expected,
            GoalieMetric::PerGame => goalie.gsax_per_game(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamStat {
    EvenStrengthGoalsFor,
    EvenStrengthGoalsAgainst,
    PowerPlayGoalsFor,
    PenaltyKillGoalsAgainst,
}

impl TeamStat {
    pub const ALL: [Self; 4] = [
        Self::EvenStrengthGoalsFor,
        Self::EvenStrengthGoalsAgainst,
        Self::PowerPlayGoalsFor,
        Self::PenaltyKillGoalsAgainst,
    ];

    #[must_use]
    pub fn is_goals_against(self) -> bool {
        matches!(
            self,
            Self::EvenStrengthGoalsAgainst | Self::PenaltyKillGoalsAgainst
        )
    }
}

/// League-relative team statistic.
///
/// # Raw measurement
///
/// - [`TeamMetricMode::Rank`]: `raw = league rank` (1 is best, so the signal
///   is always negative)
/// - [`TeamMetricMode::AdjustedGoals`]: `raw = goals × 82 / season games`
#[derive(Debug, Clone)]
pub struct TeamStatistic {
    stat: TeamStat,
    mode: TeamMetricMode,
}

impl TeamStatistic {
    #[must_use]
    pub fn new(stat: TeamStat, mode: TeamMetricMode) -> Self {
        Self { stat, mode }
    }
}

impl TeamFeature for TeamStatistic {
    fn id(&self) -> &'static str {
        match (self.stat, self.mode) {
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::Rank) => "es_gf_rank",
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::Rank) => "es_ga_rank",
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::Rank) => "pp_gf_rank",
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::Rank) => "pk_ga_rank",
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::AdjustedGoals) => "es_gf",
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::AdjustedGoals) => "es_ga",
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::AdjustedGoals) => "pp_gf",
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::AdjustedGoals) => "pk_ga",
        }
    }
    fn name(&self) -> &'static str {
        match (self.stat, self.mode) {
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::Rank) => "5v5 Goals For Rank",
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::Rank) => "5v5 Goals Against Rank",
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::Rank) => "Power Play Goals For Rank",
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::Rank) => {
                "Penalty Kill Goals Against Rank"
            }
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::AdjustedGoals) => "5v5 Goals For",
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::AdjustedGoals) => {
                "5v5 Goals Against"
            }
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::AdjustedGoals) => "Power Play Goals For",
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::AdjustedGoals) => {
                "Penalty Kill Goals Against"
            }
        }
    }
    fn signal(&self) -> FeatureSignal {
        match self.mode {
            TeamMetricMode::Rank => FeatureSignal::Negative,
            TeamMetricMode::AdjustedGoals if self.stat.is_goals_against() => {
                FeatureSignal::Negative
            }
            TeamMetricMode::AdjustedGoals => FeatureSignal::Positive,
        }
    }
    fn clone_boxed(&self) -> BoxedTeamFeature {
        Box::new(self.clone())
    }
    fn extract_raw(&self, profile: &TeamProfile) -> f64 {
        let m = &profile.metrics;
        match (self.stat, self.mode) {
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::Rank) => {
                f64::from(m.even_strength_goals_for_rank)
            }
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::Rank) => {
                f64::from(m.even_strength_goals_against_rank)
            }
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::Rank) => {
                f64::from(m.power_play_goals_for_rank)
            }
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::Rank) => {
                f64::from(m.penalty_kill_goals_against_rank)
            }
            (TeamStat::EvenStrengthGoalsFor, TeamMetricMode::AdjustedGoals) => {
                m.even_strength_goals_for
            }
            (TeamStat::EvenStrengthGoalsAgainst, TeamMetricMode::AdjustedGoals) => {
                m.even_strength_goals_against
            }
            (TeamStat::PowerPlayGoalsFor, TeamMetricMode::AdjustedGoals) => m.power_play_goals_for,
            (TeamStat::PenaltyKillGoalsAgainst, TeamMetricMode::AdjustedGoals) => {
                m.penalty_kill_goals_against
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarKind {
    SuperstarForwards,
    StarForwards,
    SuperstarDefense,
    StarDefense,
}

impl StarKind {
    pub const ALL: [Self; 4] = [
        Self::SuperstarForwards,
        Self::StarForwards,
        Self::SuperstarDefense,
        Self::StarDefense,
    ];
}

/// Number of star skaters in the team's tier pool.
#[derive(Debug, Clone)]
pub struct StarCount {
    kind: StarKind,
}

impl StarCount {
    #[must_use]
    pub fn new(kind: StarKind) -> Self {
        Self { kind }
    }
}

impl TeamFeature for StarCount {
    fn id(&self) -> &'static str {
        match self.kind {
            StarKind::SuperstarForwards => "superstar_f",
            StarKind::StarForwards => "star_f",
            StarKind::SuperstarDefense => "superstar_d",
            StarKind::StarDefense => "star_d",
        }
    }
    fn name(&self) -> &'static str {
        match self.kind {
            StarKind::SuperstarForwards => "Superstar Forwards",
            StarKind::StarForwards => "Star Forwards",
            StarKind::SuperstarDefense => "Superstar Defensemen",
            StarKind::StarDefense => "Star Defensemen",
        }
    }
    fn signal(&self) -> FeatureSignal {
        FeatureSignal::Positive
    }
    fn clone_boxed(&self) -> BoxedTeamFeature {
        Box::new(self.clone())
    }
    fn extract_raw(&self, profile: &TeamProfile) -> f64 {
        let stars = &profile.stars;
        f64::from(match self.kind {
            StarKind::SuperstarForwards => stars.superstar_forwards,
            StarKind::StarForwards => stars.star_forwards,
            StarKind::SuperstarDefense => stars.superstar_defense,
            StarKind::StarDefense => stars.star_defense,
        })
    }
}
