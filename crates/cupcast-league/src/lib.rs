//! League data model for the cupcast scoring engine.
//!
//! This crate defines the immutable, already-cleaned tables the scoring
//! engine consumes, and the explicit league configuration that replaces
//! hard-coded season lists and franchise special cases.
//!
//! # Tables
//!
//! - [`PlayerSeasonRecord`] - one row per player, team and season
//! - [`TeamSeasonRecord`] - one row per team, season and situation (5v5, PP, PK)
//! - [`PlayoffRecord`] - rounds won by a team in a season
//!
//! Player and team rows are grouped per season by [`LeagueTables`], which
//! hands out read-only [`SeasonTables`] views to the feature extractor.
//!
//! # Configuration
//!
//! [`LeagueConfig`] carries season lengths, the games-played floor, star
//! thresholds and a [`FranchiseHistory`] table. Relocations and expansion
//! teams are expressed as data: a franchise has one or more eras, each with
//! its own team code and season range.
//!
//! ```
//! use cupcast_league::{LeagueConfig, Season, TeamCode};
//!
//! let league = LeagueConfig::nhl();
//! let season: Season = "2010-2011".parse().unwrap();
//! let teams = league.active_teams(season);
//! assert!(teams.contains(&TeamCode::new("ATL")));
//! assert!(!teams.contains(&TeamCode::new("WPG")));
//! ```

pub use self::{config::*, playoff::*, record::*, season::*, tables::*, team::*};

mod config;
mod playoff;
mod record;
mod season;
mod tables;
mod team;

/// Lookup of a team-season that is absent from the source tables.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown team-season: {team} in {season}")]
pub struct UnknownTeamOrSeason {
    pub team: TeamCode,
    pub season: Season,
}

/// Lookup of a season that is not part of the league configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("season {season} is not configured")]
pub struct UnknownSeason {
    pub season: Season,
}
