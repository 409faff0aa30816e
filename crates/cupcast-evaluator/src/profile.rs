//! Intermediate per-team-season measurements that features read from.

use cupcast_league::{Season, TeamCode};
use serde::{Deserialize, Serialize};

/// Everything the extractor measured about one team-season.
///
/// Features never look at the raw tables; they read one field of this
/// profile. The profile is also written out for inspection so the selected
/// tier members can be checked against the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: TeamCode,
    pub season: Season,
    pub forward_tiers: Vec<RosterTier>,
    pub defense_tiers: Vec<RosterTier>,
    /// Forwards taken from below the games-played floor to fill the pool.
    pub padded_forwards: usize,
    /// Defensemen taken from below the games-played floor to fill the pool.
    pub padded_defense: usize,
    pub starting_goalie: GoalieSummary,
    pub metrics: TeamMetrics,
    pub stars: StarCounts,
}

/// One usage window of a roster, e.g. the second forward line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterTier {
    pub id: String,
    pub members: Vec<TierMember>,
    /// Games-weighted average game score of the members.
    pub game_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierMember {
    pub player_id: String,
    pub name: String,
    pub games_played: u32,
    /// Seconds per game played.
    pub icetime_per_game: f64,
    pub game_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalieSummary {
    pub player_id: String,
    pub name: String,
    pub games_played: u32,
    pub goals_saved_above_expected: f64,
}

impl GoalieSummary {
    #[must_use]
    pub fn gsax_per_game(&self) -> f64 {
        self.goals_saved_above_expected / f64::from(self.games_played.max(1))
    }
}

/// League-relative team statistics.
///
/// Goal totals are already scaled to a full-length season; ranks are 1-based
/// among every team of the season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub even_strength_goals_for: f64,
    pub even_strength_goals_against: f64,
    pub power_play_goals_for: f64,
    pub penalty_kill_goals_against: f64,
    pub even_strength_goals_for_rank: u32,
    pub even_strength_goals_against_rank: u32,
    pub power_play_goals_for_rank: u32,
    pub penalty_kill_goals_against_rank: u32,
}

/// Star skaters among the team's selected tier pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarCounts {
    pub superstar_forwards: u32,
    pub star_forwards: u32,
    pub superstar_defense: u32,
    pub star_defense: u32,
}
