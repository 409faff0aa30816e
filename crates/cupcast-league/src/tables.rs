use std::collections::BTreeMap;

use crate::{PlayerSeasonRecord, Season, Situation, TeamCode, TeamSeasonRecord};

/// Player and team records grouped by season.
///
/// The tables are immutable snapshots: they are built once from the loaded
/// rows and only handed out as shared [`SeasonTables`] views.
#[derive(Debug, Clone, Default)]
pub struct LeagueTables {
    players: BTreeMap<Season, Vec<PlayerSeasonRecord>>,
    teams: BTreeMap<Season, Vec<TeamSeasonRecord>>,
}

/// Read-only view of one season's records.
#[derive(Debug, Clone, Copy)]
pub struct SeasonTables<'a> {
    pub season: Season,
    pub players: &'a [PlayerSeasonRecord],
    pub teams: &'a [TeamSeasonRecord],
}

impl LeagueTables {
    #[must_use]
    pub fn new<P, T>(players: P, teams: T) -> Self
    where
        P: IntoIterator<Item = PlayerSeasonRecord>,
        T: IntoIterator<Item = TeamSeasonRecord>,
    {
        let mut by_season_players = BTreeMap::<_, Vec<_>>::new();
        for player in players {
            by_season_players
                .entry(player.season)
                .or_default()
                .push(player);
        }
        let mut by_season_teams = BTreeMap::<_, Vec<_>>::new();
        for team in teams {
            by_season_teams.entry(team.season).or_default().push(team);
        }
        Self {
            players: by_season_players,
            teams: by_season_teams,
        }
    }

    /// Seasons that have both player and team rows.
    pub fn seasons(&self) -> impl Iterator<Item = Season> + '_ {
        self.players
            .keys()
            .copied()
            .filter(|season| self.teams.contains_key(season))
    }

    /// View of `season`, or `None` if either table has no rows for it.
    #[must_use]
    pub fn season(&self, season: Season) -> Option<SeasonTables<'_>> {
        Some(SeasonTables {
            season,
            players: self.players.get(&season)?,
            teams: self.teams.get(&season)?,
        })
    }
}

impl<'a> SeasonTables<'a> {
    /// All-strengths player rows of `team`.
    pub fn team_players(self, team: &TeamCode) -> impl Iterator<Item = &'a PlayerSeasonRecord> {
        self.players
            .iter()
            .filter(move |p| &p.team == team && p.situation == Situation::All)
    }

    /// All-strengths player rows of the whole league.
    pub fn league_players(self) -> impl Iterator<Item = &'a PlayerSeasonRecord> {
        self.players
            .iter()
            .filter(|p| p.situation == Situation::All)
    }

    /// Team rows recorded in `situation`, one per team.
    pub fn team_split(self, situation: Situation) -> impl Iterator<Item = &'a TeamSeasonRecord> {
        self.teams.iter().filter(move |t| t.situation == situation)
    }

    /// Whether `team` has all-strengths player rows and at least one team row.
    #[must_use]
    pub fn has_team(&self, team: &TeamCode) -> bool {
        self.team_players(team).next().is_some() && self.teams.iter().any(|t| &t.team == team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn skater(team: &str, situation: Situation) -> PlayerSeasonRecord {
        PlayerSeasonRecord {
            player_id: format!("{team}-1"),
            name: "Skater".to_owned(),
            team: TeamCode::new(team),
            season: Season::new(2022),
            position: Position::Forward,
            situation,
            games_played: 60,
            icetime: 60.0 * 900.0,
            points: 40,
            game_score: 30.0,
            expected_goals_against: None,
            goals_against: None,
        }
    }

    fn team_row(team: &str) -> TeamSeasonRecord {
        TeamSeasonRecord {
            team: TeamCode::new(team),
            season: Season::new(2022),
            situation: Situation::All,
            goals_for: 250.0,
            goals_against: 220.0,
        }
    }

    #[test]
    fn test_has_team_requires_all_strength_players() {
        let tables = LeagueTables::new(
            [
                skater("TOR", Situation::All),
                skater("BOS", Situation::EvenStrength),
            ],
            [team_row("TOR"), team_row("BOS")],
        );
        let season = tables.season(Season::new(2022)).unwrap();
        assert!(season.has_team(&TeamCode::new("TOR")));
        assert!(!season.has_team(&TeamCode::new("BOS")));
        assert!(!season.has_team(&TeamCode::new("MTL")));
        assert!(tables.season(Season::new(2021)).is_none());
    }
}
