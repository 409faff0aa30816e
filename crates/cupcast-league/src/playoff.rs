use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Season, TeamCode, UnknownTeamOrSeason};

/// Number of playoff rounds a champion wins.
pub const CHAMPION_ROUNDS: u8 = 4;

/// Playoff outcome of a team in a season.
///
/// Serialized as an integer: `-1` for a team that did not qualify, otherwise
/// the number of rounds won (`0..=4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum PlayoffResult {
    DidNotQualify,
    RoundsWon(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid playoff result {value}: expected -1 or 0..=4")]
pub struct InvalidPlayoffResult {
    pub value: i8,
}

impl TryFrom<i8> for PlayoffResult {
    type Error = InvalidPlayoffResult;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::DidNotQualify),
            0..=4 => Ok(Self::RoundsWon(value.unsigned_abs())),
            _ => Err(InvalidPlayoffResult { value }),
        }
    }
}

impl From<PlayoffResult> for i8 {
    fn from(result: PlayoffResult) -> Self {
        match result {
            PlayoffResult::DidNotQualify => -1,
            PlayoffResult::RoundsWon(rounds) => i8::try_from(rounds).unwrap_or(i8::MAX),
        }
    }
}

impl PlayoffResult {
    #[must_use]
    pub fn rounds_won(self) -> Option<u8> {
        match self {
            Self::DidNotQualify => None,
            Self::RoundsWon(rounds) => Some(rounds),
        }
    }

    #[must_use]
    pub fn qualified(self) -> bool {
        matches!(self, Self::RoundsWon(_))
    }

    /// Qualified and won at least `rounds` rounds.
    #[must_use]
    pub fn won_at_least(self, rounds: u8) -> bool {
        self.rounds_won().is_some_and(|won| won >= rounds)
    }

    /// Qualified and won exactly `rounds` rounds.
    #[must_use]
    pub fn won_exactly(self, rounds: u8) -> bool {
        self.rounds_won() == Some(rounds)
    }

    #[must_use]
    pub fn is_champion(self) -> bool {
        self.won_exactly(CHAMPION_ROUNDS)
    }
}

/// Subpopulation of team-seasons selected by playoff result.
///
/// Written as `all`, `dnq`, `exactly-N` or `at-least-N`. Only `all` includes
/// teams that did not qualify; the round filters select qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultPopulation {
    All,
    DidNotQualify,
    Exactly(u8),
    AtLeast(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid population '{input}': expected all, dnq, exactly-N or at-least-N")]
pub struct ParsePopulationError {
    pub input: String,
}

impl ResultPopulation {
    /// The subpopulations baselines are computed for by default: all teams,
    /// then alternating "exactly k" / "at least k+1" down to champions.
    #[must_use]
    pub fn standard() -> Vec<Self> {
        vec![
            Self::All,
            Self::Exactly(0),
            Self::AtLeast(1),
            Self::Exactly(1),
            Self::AtLeast(2),
            Self::Exactly(2),
            Self::AtLeast(3),
            Self::Exactly(3),
            Self::AtLeast(CHAMPION_ROUNDS),
        ]
    }

    #[must_use]
    pub fn contains(self, result: PlayoffResult) -> bool {
        match self {
            Self::All => true,
            Self::DidNotQualify => !result.qualified(),
            Self::Exactly(rounds) => result.won_exactly(rounds),
            Self::AtLeast(rounds) => result.won_at_least(rounds),
        }
    }

    /// Human-readable description for reports.
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::All => "All teams".to_owned(),
            Self::DidNotQualify => "Teams that missed the playoffs".to_owned(),
            Self::Exactly(0) => "Teams that didn't win a round".to_owned(),
            Self::Exactly(rounds) => format!("Teams that won only {rounds} round(s)"),
            Self::AtLeast(rounds) => format!("Teams that won at least {rounds} round(s)"),
        }
    }
}

impl fmt::Display for ResultPopulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::DidNotQualify => f.write_str("dnq"),
            Self::Exactly(rounds) => write!(f, "exactly-{rounds}"),
            Self::AtLeast(rounds) => write!(f, "at-least-{rounds}"),
        }
    }
}

impl FromStr for ResultPopulation {
    type Err = ParsePopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePopulationError {
            input: s.to_owned(),
        };
        let rounds = |n: &str| {
            n.parse::<u8>()
                .ok()
                .filter(|n| *n <= CHAMPION_ROUNDS)
                .ok_or_else(err)
        };
        match s.trim() {
            "all" => Ok(Self::All),
            "dnq" => Ok(Self::DidNotQualify),
            other => {
                if let Some(n) = other.strip_prefix("exactly-") {
                    Ok(Self::Exactly(rounds(n)?))
                } else if let Some(n) = other.strip_prefix("at-least-") {
                    Ok(Self::AtLeast(rounds(n)?))
                } else {
                    Err(err())
                }
            }
        }
    }
}

impl Serialize for ResultPopulation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResultPopulation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the playoff-result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffRecord {
    pub season: Season,
    pub team: TeamCode,
    pub result: PlayoffResult,
    /// Regular-season standings rank, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standings_rank: Option<u32>,
}

/// Playoff results indexed by season and team.
///
/// The table normally lists only the teams that reached the playoffs. A team
/// missing from a season that *is* present in the table did not qualify; a
/// season missing entirely is an unknown lookup.
#[derive(Debug, Clone, Default)]
pub struct PlayoffResults {
    seasons: BTreeMap<Season, BTreeMap<TeamCode, PlayoffRecord>>,
}

impl PlayoffResults {
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PlayoffRecord>,
    {
        let mut seasons = BTreeMap::<_, BTreeMap<_, _>>::new();
        for record in records {
            seasons
                .entry(record.season)
                .or_default()
                .insert(record.team.clone(), record);
        }
        Self { seasons }
    }

    pub fn seasons(&self) -> impl Iterator<Item = Season> + '_ {
        self.seasons.keys().copied()
    }

    #[must_use]
    pub fn contains_season(&self, season: Season) -> bool {
        self.seasons.contains_key(&season)
    }

    /// Looks up a team's result.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTeamOrSeason`] if the season has no entries at all.
    pub fn result(
        &self,
        season: Season,
        team: &TeamCode,
    ) -> Result<PlayoffResult, UnknownTeamOrSeason> {
        let teams = self
            .seasons
            .get(&season)
            .ok_or_else(|| UnknownTeamOrSeason {
                team: team.clone(),
                season,
            })?;
        Ok(teams
            .get(team)
            .map_or(PlayoffResult::DidNotQualify, |r| r.result))
    }

    #[must_use]
    pub fn standings_rank(&self, season: Season, team: &TeamCode) -> Option<u32> {
        self.seasons.get(&season)?.get(team)?.standings_rank
    }

    /// The team that won every round in `season`, if recorded.
    #[must_use]
    pub fn champion(&self, season: Season) -> Option<&TeamCode> {
        self.seasons
            .get(&season)?
            .values()
            .find(|r| r.result.is_champion())
            .map(|r| &r.team)
    }
}
