use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Season, TeamCode, UnknownSeason};

/// League-wide configuration consulted by feature extraction and baselines.
///
/// Everything that differs between seasons or franchises lives here as data:
/// season lengths (for shortened seasons), the games-played floor used to
/// select regular players, star thresholds, and franchise history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Games in a full regular season.
    pub regular_season_games: u32,
    /// Games-played floor at full season length; scaled for shorter seasons.
    pub min_games_base: u32,
    /// Games played per configured season.
    pub seasons: BTreeMap<Season, u32>,
    pub stars: StarThresholds,
    pub franchises: FranchiseHistory,
}

/// A league configuration that cannot scale season totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LeagueConfigError {
    #[display("regular_season_games must be positive")]
    NoRegularSeasonGames,
    #[display("season {season} is configured with zero games")]
    EmptySeason { season: Season },
    #[display("{_0}")]
    UnknownSeason(UnknownSeason),
}

impl From<UnknownSeason> for LeagueConfigError {
    fn from(error: UnknownSeason) -> Self {
        Self::UnknownSeason(error)
    }
}

/// League-wide points-per-game rank cutoffs for star classification.
///
/// A forward ranked `1..=forward_superstar` is a superstar, one ranked
/// `forward_superstar + 1..=forward_star` is a star; likewise for defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarThresholds {
    pub forward_superstar: u32,
    pub forward_star: u32,
    pub defense_superstar: u32,
    pub defense_star: u32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            forward_superstar: 25,
            forward_star: 100,
            defense_superstar: 15,
            defense_star: 50,
        }
    }
}

/// Franchise history: which team code each franchise used in which seasons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FranchiseHistory {
    pub franchises: Vec<Franchise>,
}

/// A franchise and its eras in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Franchise {
    pub name: String,
    pub eras: Vec<FranchiseEra>,
}

/// A span of seasons a franchise played under one team code.
///
/// Both bounds are inclusive; an absent bound is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FranchiseEra {
    pub code: TeamCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_season: Option<Season>,
}

impl FranchiseEra {
    #[must_use]
    pub fn contains(&self, season: Season) -> bool {
        self.first_season.is_none_or(|first| first <= season)
            && self.last_season.is_none_or(|last| season <= last)
    }
}

impl Franchise {
    /// Team code the franchise used in `season`, or `None` if it did not play.
    #[must_use]
    pub fn code_in(&self, season: Season) -> Option<&TeamCode> {
        self.eras
            .iter()
            .find(|era| era.contains(season))
            .map(|era| &era.code)
    }

    /// Code of the franchise's latest era.
    #[must_use]
    pub fn current_code(&self) -> Option<&TeamCode> {
        self.eras.last().map(|era| &era.code)
    }
}

impl FranchiseHistory {
    /// Franchise that has ever used `code`.
    #[must_use]
    pub fn franchise_of(&self, code: &TeamCode) -> Option<&Franchise> {
        self.franchises
            .iter()
            .find(|f| f.eras.iter().any(|era| &era.code == code))
    }

    /// Codes of all franchises active in `season`, sorted alphabetically.
    #[must_use]
    pub fn active_codes(&self, season: Season) -> Vec<TeamCode> {
        let mut codes = self
            .franchises
            .iter()
            .filter_map(|f| f.code_in(season).cloned())
            .collect::<Vec<_>>();
        codes.sort();
        codes
    }
}

impl LeagueConfig {
    /// Configured seasons in chronological order.
    pub fn seasons(&self) -> impl Iterator<Item = Season> + '_ {
        self.seasons.keys().copied()
    }

    #[must_use]
    pub fn contains_season(&self, season: Season) -> bool {
        self.seasons.contains_key(&season)
    }

    /// Checks that every season length can be scaled to a full season.
    ///
    /// # Errors
    ///
    /// Fails if the full season or any configured season has zero games.
    pub fn validate(&self) -> Result<(), LeagueConfigError> {
        if self.regular_season_games == 0 {
            return Err(LeagueConfigError::NoRegularSeasonGames);
        }
        match self.seasons.iter().find(|(_, games)| **games == 0) {
            Some((season, _)) => Err(LeagueConfigError::EmptySeason { season: *season }),
            None => Ok(()),
        }
    }

    /// Games each team played in `season`.
    ///
    /// # Errors
    ///
    /// Fails if `season` is not configured or has zero games.
    pub fn season_games(&self, season: Season) -> Result<u32, LeagueConfigError> {
        match self.seasons.get(&season) {
            None => Err(UnknownSeason { season }.into()),
            Some(0) => Err(LeagueConfigError::EmptySeason { season }),
            Some(games) => Ok(*games),
        }
    }

    fn full_season_games(&self) -> Result<u32, LeagueConfigError> {
        match self.regular_season_games {
            0 => Err(LeagueConfigError::NoRegularSeasonGames),
            games => Ok(games),
        }
    }

    /// Factor that scales `season` totals to a full-length season.
    ///
    /// A 56-game season has a factor of `82 / 56`.
    pub fn games_adjustment(&self, season: Season) -> Result<f64, LeagueConfigError> {
        let full = self.full_season_games()?;
        let games = self.season_games(season)?;
        Ok(f64::from(full) / f64::from(games))
    }

    /// Games-played floor for `season`, scaled down proportionally for
    /// shortened seasons (30 at 82 games becomes 20 at 56).
    pub fn min_games_played(&self, season: Season) -> Result<u32, LeagueConfigError> {
        let full = self.full_season_games()?;
        let games = self.season_games(season)?;
        let floor = u64::from(self.min_games_base) * u64::from(games) / u64::from(full);
        Ok(u32::try_from(floor).unwrap_or(u32::MAX))
    }

    /// Team codes playing in `season`, sorted alphabetically.
    #[must_use]
    pub fn active_teams(&self, season: Season) -> Vec<TeamCode> {
        self.franchises.active_codes(season)
    }

    /// NHL configuration for the 2008-09 through 2024-25 seasons.
    #[must_use]
    pub fn nhl() -> Self {
        let mut seasons = (2008..=2024)
            .map(|year| (Season::new(year), 82))
            .collect::<BTreeMap<_, _>>();
        seasons.insert(Season::new(2012), 48);
        seasons.insert(Season::new(2019), 70);
        seasons.insert(Season::new(2020), 56);

        let always = |name: &str, code: &str| Franchise {
            name: name.to_owned(),
            eras: vec![FranchiseEra {
                code: TeamCode::new(code),
                first_season: None,
                last_season: None,
            }],
        };
        let era = |code: &str, first: Option<u16>, last: Option<u16>| FranchiseEra {
            code: TeamCode::new(code),
            first_season: first.map(Season::new),
            last_season: last.map(Season::new),
        };

        let mut franchises = [
            ("Anaheim Ducks", "ANA"),
            ("Boston Bruins", "BOS"),
            ("Buffalo Sabres", "BUF"),
            ("Calgary Flames", "CGY"),
            ("Carolina Hurricanes", "CAR"),
            ("Chicago Blackhawks", "CHI"),
            ("Colorado Avalanche", "COL"),
            ("Columbus Blue Jackets", "CBJ"),
            ("Dallas Stars", "DAL"),
            ("Detroit Red Wings", "DET"),
            ("Edmonton Oilers", "EDM"),
            ("Florida Panthers", "FLA"),
            ("Los Angeles Kings", "LAK"),
            ("Minnesota Wild", "MIN"),
            ("Montreal Canadiens", "MTL"),
            ("Nashville Predators", "NSH"),
            ("New Jersey Devils", "NJD"),
            ("New York Islanders", "NYI"),
            ("New York Rangers", "NYR"),
            ("Ottawa Senators", "OTT"),
            ("Philadelphia Flyers", "PHI"),
            ("Pittsburgh Penguins", "PIT"),
            ("San Jose Sharks", "SJS"),
            ("St. Louis Blues", "STL"),
            ("Tampa Bay Lightning", "TBL"),
            ("Toronto Maple Leafs", "TOR"),
            ("Vancouver Canucks", "VAN"),
            ("Washington Capitals", "WSH"),
        ]
        .into_iter()
        .map(|(name, code)| always(name, code))
        .collect::<Vec<_>>();

        franchises.extend([
            Franchise {
                name: "Winnipeg Jets".to_owned(),
                eras: vec![era("ATL", None, Some(2010)), era("WPG", Some(2011), None)],
            },
            Franchise {
                name: "Utah Hockey Club".to_owned(),
                eras: vec![era("ARI", None, Some(2023)), era("UTA", Some(2024), None)],
            },
            Franchise {
                name: "Vegas Golden Knights".to_owned(),
                eras: vec![era("VGK", Some(2017), None)],
            },
            Franchise {
                name: "Seattle Kraken".to_owned(),
                eras: vec![era("SEA", Some(2021), None)],
            },
        ]);

        Self {
            regular_season_games: 82,
            min_games_base: 30,
            seasons,
            stars: StarThresholds::default(),
            franchises: FranchiseHistory { franchises },
        }
    }
}
