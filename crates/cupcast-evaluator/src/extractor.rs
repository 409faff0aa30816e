//! Team feature extraction from season tables.
//!
//! For one team-season the extractor:
//!
//! 1. selects each skater group's tier pool: the `pool_size` players with
//!    the most games played, preferring players at or above the season's
//!    games-played floor,
//! 2. re-orders the pool by ice time per game and cuts it into the layout's
//!    windows,
//! 3. picks the starting goalie (most games played),
//! 4. looks up the team's league-relative metrics and star counts,
//!
//! and records all of it in a [`TeamProfile`]. The feature values are then
//! read from the profile in feature order.

use std::{cmp::Ordering, collections::BTreeMap};

use cupcast_league::{
    LeagueConfig, LeagueConfigError, LeagueTables, PlayerSeasonRecord, Position, Season,
    SeasonTables, Situation, TeamCode, UnknownTeamOrSeason,
};

use crate::{
    feature_table::{FeatureTable, FeatureVector},
    league_rank::{RankOrder, league_ranks},
    profile::{GoalieSummary, RosterTier, StarCounts, TeamMetrics, TeamProfile, TierMember},
    stars::{StarClassifier, StarLevel},
    team_feature::{BoxedTeamFeature, FeatureSet, SkaterGroup, TeamFeature as _, TierLayout},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ExtractError {
    #[display("{team} {season}: {tier} needs {required} player(s), found {available}")]
    MissingRosterData {
        team: TeamCode,
        season: Season,
        tier: String,
        required: usize,
        available: usize,
    },
    #[display("{_0}")]
    UnknownTeamOrSeason(UnknownTeamOrSeason),
    #[display("{team} {season}: player {player} has no {stat}")]
    MissingStatistic {
        team: TeamCode,
        season: Season,
        player: String,
        stat: &'static str,
    },
    #[display("{team} {season}: {error}")]
    LeagueConfig {
        team: TeamCode,
        season: Season,
        error: LeagueConfigError,
    },
}

impl ExtractError {
    /// Team-season the failure belongs to.
    #[must_use]
    pub fn team_season(&self) -> (&TeamCode, Season) {
        match self {
            Self::MissingRosterData { team, season, .. }
            | Self::MissingStatistic { team, season, .. }
            | Self::LeagueConfig { team, season, .. } => (team, *season),
            Self::UnknownTeamOrSeason(e) => (&e.team, e.season),
        }
    }
}

/// Result of extracting one team-season.
#[derive(Debug, Clone)]
pub struct TeamFeatures {
    pub profile: TeamProfile,
    pub vector: FeatureVector,
}

/// Result of extracting every active team of every configured season.
#[derive(Debug, Clone)]
pub struct BatchExtraction {
    pub table: FeatureTable,
    pub profiles: Vec<TeamProfile>,
    pub failures: Vec<ExtractError>,
    /// Configured seasons with no player or team rows at all.
    pub missing_seasons: Vec<Season>,
    /// Configured seasons whose length cannot be scaled to a full season.
    pub invalid_seasons: Vec<LeagueConfigError>,
}

#[derive(Debug, Clone)]
pub struct FeatureExtractor<'a> {
    league: &'a LeagueConfig,
    feature_set: FeatureSet,
    features: Vec<BoxedTeamFeature>,
}

/// Per-season values shared by every team of the season.
#[derive(Debug)]
struct SeasonContext<'a> {
    tables: SeasonTables<'a>,
    min_games: u32,
    metrics: BTreeMap<TeamCode, TeamMetrics>,
    stars: StarClassifier,
}

#[derive(Debug)]
struct TierSelection<'a> {
    tiers: Vec<RosterTier>,
    pool: Vec<&'a PlayerSeasonRecord>,
    padded: usize,
}

impl<'a> FeatureExtractor<'a> {
    #[must_use]
    pub fn new(league: &'a LeagueConfig, feature_set: FeatureSet) -> Self {
        let features = feature_set.build_features();
        Self {
            league,
            feature_set,
            features,
        }
    }

    #[must_use]
    pub fn feature_set(&self) -> &FeatureSet {
        &self.feature_set
    }

    #[must_use]
    pub fn features(&self) -> &[BoxedTeamFeature] {
        &self.features
    }

    /// Extracts the features of `team` in `season`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::UnknownTeamOrSeason`] if the season is not configured
    ///   or the team has no rows in the player or team table
    /// - [`ExtractError::MissingRosterData`] if a tier window cannot be filled
    ///   or the team has no goalie with a game played
    /// - [`ExtractError::MissingStatistic`] if the starting goalie lacks
    ///   expected-goals data
    /// - [`ExtractError::LeagueConfig`] if the season has zero configured
    ///   games
    pub fn extract(
        &self,
        tables: &LeagueTables,
        team: &TeamCode,
        season: Season,
    ) -> Result<TeamFeatures, ExtractError> {
        match self.season_context(tables, season) {
            Ok(Some(context)) => self.extract_in(&context, team),
            Ok(None) | Err(LeagueConfigError::UnknownSeason(_)) => Err(unknown(team, season)),
            Err(error) => Err(ExtractError::LeagueConfig {
                team: team.clone(),
                season,
                error,
            }),
        }
    }

    /// Extracts every active team of every configured season, collecting
    /// failures instead of stopping at the first one.
    #[must_use]
    pub fn extract_all(&self, tables: &LeagueTables) -> BatchExtraction {
        let mut rows = vec![];
        let mut profiles = vec![];
        let mut failures = vec![];
        let mut missing_seasons = vec![];
        let mut invalid_seasons = vec![];
        for season in self.league.seasons() {
            let context = match self.season_context(tables, season) {
                Ok(Some(context)) => context,
                Ok(None) => {
                    missing_seasons.push(season);
                    continue;
                }
                Err(error) => {
                    invalid_seasons.push(error);
                    continue;
                }
            };
            for team in self.league.active_teams(season) {
                match self.extract_in(&context, &team) {
                    Ok(TeamFeatures { profile, vector }) => {
                        rows.push(vector);
                        profiles.push(profile);
                    }
                    Err(error) => failures.push(error),
                }
            }
        }
        BatchExtraction {
            table: FeatureTable::new(self.feature_set.clone(), rows),
            profiles,
            failures,
            missing_seasons,
            invalid_seasons,
        }
    }

    fn season_context<'t>(
        &self,
        tables: &'t LeagueTables,
        season: Season,
    ) -> Result<Option<SeasonContext<'t>>, LeagueConfigError> {
        let min_games = self.league.min_games_played(season)?;
        let adjustment = self.league.games_adjustment(season)?;
        let Some(tables) = tables.season(season) else {
            return Ok(None);
        };
        Ok(Some(SeasonContext {
            tables,
            min_games,
            metrics: team_metrics(tables, adjustment),
            stars: StarClassifier::new(tables.league_players(), min_games, self.league.stars),
        }))
    }

    fn extract_in(
        &self,
        context: &SeasonContext<'_>,
        team: &TeamCode,
    ) -> Result<TeamFeatures, ExtractError> {
        let season = context.tables.season;
        if !context.tables.has_team(team) {
            return Err(unknown(team, season));
        }
        let metrics = *context
            .metrics
            .get(team)
            .ok_or_else(|| unknown(team, season))?;

        let roster = context.tables.team_players(team).collect::<Vec<_>>();
        let forwards = self.select_tiers(context, team, &roster, SkaterGroup::Forward)?;
        let defense = self.select_tiers(context, team, &roster, SkaterGroup::Defense)?;
        let starting_goalie = starting_goalie(team, season, &roster)?;
        let stars = count_stars(
            &context.stars,
            forwards.pool.iter().chain(&defense.pool).copied(),
        );

        let profile = TeamProfile {
            team: team.clone(),
            season,
            forward_tiers: forwards.tiers,
            defense_tiers: defense.tiers,
            padded_forwards: forwards.padded,
            padded_defense: defense.padded,
            starting_goalie,
            metrics,
            stars,
        };
        let values = self
            .features
            .iter()
            .map(|f| f.extract_raw(&profile))
            .collect();
        let vector = FeatureVector {
            team: team.clone(),
            season,
            values,
        };
        Ok(TeamFeatures { profile, vector })
    }

    fn select_tiers<'r>(
        &self,
        context: &SeasonContext<'_>,
        team: &TeamCode,
        roster: &[&'r PlayerSeasonRecord],
        group: SkaterGroup,
    ) -> Result<TierSelection<'r>, ExtractError> {
        let layout = self.feature_set.tiers(group);
        let position = match group {
            SkaterGroup::Forward => Position::Forward,
            SkaterGroup::Defense => Position::Defense,
        };

        // Most games first, so regulars at or above the floor fill the pool
        // before anyone below it.
        let mut pool = roster
            .iter()
            .copied()
            .filter(|p| p.position == position && p.games_played > 0)
            .collect::<Vec<_>>();
        pool.sort_by(|a, b| by_usage(a, b));
        pool.truncate(layout.pool_size());
        pool.sort_by(|a, b| by_icetime(a, b));
        let padded = pool
            .iter()
            .filter(|p| p.games_played < context.min_games)
            .count();

        let mut tiers = vec![];
        for range in layout.ranges() {
            let id = TierLayout::tier_id(group, &range);
            let available = pool.len().saturating_sub(range.start).min(range.len());
            if available < range.len() {
                return Err(ExtractError::MissingRosterData {
                    team: team.clone(),
                    season: context.tables.season,
                    tier: id,
                    required: range.len(),
                    available,
                });
            }
            let members = &pool[range];
            tiers.push(RosterTier {
                id,
                game_score: games_weighted_game_score(members),
                members: members.iter().map(|p| tier_member(p)).collect(),
            });
        }
        Ok(TierSelection {
            tiers,
            pool,
            padded,
        })
    }
}

fn unknown(team: &TeamCode, season: Season) -> ExtractError {
    ExtractError::UnknownTeamOrSeason(UnknownTeamOrSeason {
        team: team.clone(),
        season,
    })
}

/// Games played descending, then ice time per game descending, then player id.
fn by_usage(a: &PlayerSeasonRecord, b: &PlayerSeasonRecord) -> Ordering {
    b.games_played
        .cmp(&a.games_played)
        .then_with(|| by_icetime(a, b))
}

/// Ice time per game descending, then player id.
fn by_icetime(a: &PlayerSeasonRecord, b: &PlayerSeasonRecord) -> Ordering {
    b.icetime_per_game()
        .total_cmp(&a.icetime_per_game())
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// `Σ(game_score × games) / Σ(games)`; every pool member has played.
fn games_weighted_game_score(members: &[&PlayerSeasonRecord]) -> f64 {
    let games = members
        .iter()
        .map(|p| f64::from(p.games_played))
        .sum::<f64>();
    if games == 0.0 {
        return 0.0;
    }
    let weighted = members
        .iter()
        .map(|p| p.game_score * f64::from(p.games_played))
        .sum::<f64>();
    weighted / games
}

fn tier_member(player: &PlayerSeasonRecord) -> TierMember {
    TierMember {
        player_id: player.player_id.clone(),
        name: player.name.clone(),
        games_played: player.games_played,
        icetime_per_game: player.icetime_per_game(),
        game_score: player.game_score,
    }
}

fn starting_goalie(
    team: &TeamCode,
    season: Season,
    roster: &[&PlayerSeasonRecord],
) -> Result<GoalieSummary, ExtractError> {
    let goalie = roster
        .iter()
        .copied()
        .filter(|p| p.position == Position::Goalie && p.games_played > 0)
        .min_by(|a, b| by_usage(a, b))
        .ok_or_else(|| ExtractError::MissingRosterData {
            team: team.clone(),
            season,
            tier: "starting goalie".to_owned(),
            required: 1,
            available: 0,
        })?;
    let gsax = goalie
        .goals_saved_above_expected()
        .ok_or_else(|| ExtractError::MissingStatistic {
            team: team.clone(),
            season,
            player: goalie.player_id.clone(),
            stat: "expected goals against",
        })?;
    Ok(GoalieSummary {
        player_id: goalie.player_id.clone(),
        name: goalie.name.clone(),
        games_played: goalie.games_played,
        goals_saved_above_expected: gsax,
    })
}

fn count_stars<'a, I>(classifier: &StarClassifier, pool: I) -> StarCounts
where
    I: IntoIterator<Item = &'a PlayerSeasonRecord>,
{
    let mut counts = StarCounts::default();
    for player in pool {
        let slot = match (player.position, classifier.classify(player)) {
            (Position::Forward, Some(StarLevel::Superstar)) => &mut counts.superstar_forwards,
            (Position::Forward, Some(StarLevel::Star)) => &mut counts.star_forwards,
            (Position::Defense, Some(StarLevel::Superstar)) => &mut counts.superstar_defense,
            (Position::Defense, Some(StarLevel::Star)) => &mut counts.star_defense,
            _ => continue,
        };
        *slot += 1;
    }
    counts
}

/// Season-length-adjusted goal totals and league ranks of every team with a
/// row in all four splits.
fn team_metrics(tables: SeasonTables<'_>, adjustment: f64) -> BTreeMap<TeamCode, TeamMetrics> {
    let split = |situation: Situation, against: bool| {
        tables
            .team_split(situation)
            .map(|t| {
                let goals = if against { t.goals_against } else { t.goals_for };
                (t.team.clone(), goals * adjustment)
            })
            .collect::<BTreeMap<_, _>>()
    };
    let rank = |values: &BTreeMap<TeamCode, f64>, order: RankOrder| {
        league_ranks(values.iter().map(|(team, v)| (team, *v)), order)
    };

    let es_gf = split(Situation::EvenStrength, false);
    let es_ga = split(Situation::EvenStrength, true);
    let pp_gf = split(Situation::PowerPlay, false);
    let pk_ga = split(Situation::PenaltyKill, true);
    let es_gf_rank = rank(&es_gf, RankOrder::HighestFirst);
    let es_ga_rank = rank(&es_ga, RankOrder::LowestFirst);
    let pp_gf_rank = rank(&pp_gf, RankOrder::HighestFirst);
    let pk_ga_rank = rank(&pk_ga, RankOrder::LowestFirst);

    es_gf
        .keys()
        .filter_map(|team| {
            let metrics = TeamMetrics {
                even_strength_goals_for: *es_gf.get(team)?,
                even_strength_goals_against: *es_ga.get(team)?,
                power_play_goals_for: *pp_gf.get(team)?,
                penalty_kill_goals_against: *pk_ga.get(team)?,
                even_strength_goals_for_rank: *es_gf_rank.get(team)?,
                even_strength_goals_against_rank: *es_ga_rank.get(team)?,
                power_play_goals_for_rank: *pp_gf_rank.get(team)?,
                penalty_kill_goals_against_rank: *pk_ga_rank.get(team)?,
            };
            Some((team.clone(), metrics))
        })
        .collect()
}
