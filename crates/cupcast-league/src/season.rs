use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A league season, identified by the calendar year it starts in.
///
/// Seasons are written as `"2024-2025"`: the start year, a hyphen, and the
/// following year. That form is used both for display and for serialization.
///
/// # Example
///
/// ```
/// use cupcast_league::Season;
///
/// let season: Season = "2020-2021".parse().unwrap();
/// assert_eq!(season.start_year(), 2020);
/// assert_eq!(season.to_string(), "2020-2021");
/// assert!(season < Season::new(2021));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(u16);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid season '{input}': expected 'YYYY-YYYY' with consecutive years")]
pub struct ParseSeasonError {
    pub input: String,
}

impl Season {
    #[must_use]
    pub const fn new(start_year: u16) -> Self {
        Self(start_year)
    }

    #[must_use]
    pub const fn start_year(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn end_year(self) -> u32 {
        u32::from(self.0) + 1
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.end_year())
    }
}

impl FromStr for Season {
    type Err = ParseSeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeasonError {
            input: s.to_owned(),
        };
        let (start, end) = s.split_once('-').ok_or_else(err)?;
        let start = start.trim().parse::<u16>().map_err(|_| err())?;
        let end = end.trim().parse::<u16>().map_err(|_| err())?;
        if start.checked_add(1) != Some(end) {
            return Err(err());
        }
        Ok(Self(start))
    }
}

impl Serialize for Season {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Season {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
