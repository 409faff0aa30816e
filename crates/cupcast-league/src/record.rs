use serde::{Deserialize, Serialize};

use crate::{Season, TeamCode};

/// Playing position of a player.
///
/// Source data uses single-letter codes. Centers and wingers (`C`, `L`, `R`,
/// `W`, `F`) are all forwards; `D` is defense and `G` is goalie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Position {
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "D")]
    Defense,
    #[serde(rename = "G")]
    Goalie,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown position code '{code}'")]
pub struct UnknownPosition {
    pub code: String,
}

impl TryFrom<String> for Position {
    type Error = UnknownPosition;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        match code.trim().to_ascii_uppercase().as_str() {
            "C" | "L" | "R" | "W" | "F" | "LW" | "RW" => Ok(Self::Forward),
            "D" => Ok(Self::Defense),
            "G" => Ok(Self::Goalie),
            _ => Err(UnknownPosition { code }),
        }
    }
}

/// Game situation a statistics row was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    /// All strengths combined.
    #[serde(rename = "all")]
    All,
    /// Five-on-five even strength.
    #[serde(rename = "5on5")]
    EvenStrength,
    /// Five-on-four power play.
    #[serde(rename = "5on4")]
    PowerPlay,
    /// Four-on-five penalty kill.
    #[serde(rename = "4on5")]
    PenaltyKill,
}

impl Situation {
    fn all() -> Self {
        Self::All
    }
}

/// Season totals of one player for one team.
///
/// `game_score` is already a per-game figure; tier averages weight it by
/// `games_played`. Goalie rows additionally carry expected and actual goals
/// against; for skaters these are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonRecord {
    pub player_id: String,
    pub name: String,
    pub team: TeamCode,
    pub season: Season,
    pub position: Position,
    #[serde(default = "Situation::all")]
    pub situation: Situation,
    pub games_played: u32,
    /// Total ice time in seconds.
    pub icetime: f64,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub game_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_goals_against: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_against: Option<f64>,
}

impl PlayerSeasonRecord {
    /// Average ice time per game played, in seconds.
    #[must_use]
    pub fn icetime_per_game(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.icetime / f64::from(self.games_played)
        }
    }

    #[must_use]
    pub fn points_per_game(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.points) / f64::from(self.games_played)
        }
    }

    /// Goals saved above expected: expected goals against minus goals against.
    ///
    /// `None` unless both goalie columns are present.
    #[must_use]
    pub fn goals_saved_above_expected(&self) -> Option<f64> {
        Some(self.expected_goals_against? - self.goals_against?)
    }
}

/// Season totals of one team in one situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeasonRecord {
    pub team: TeamCode,
    pub season: Season,
    pub situation: Situation,
    pub goals_for: f64,
    pub goals_against: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_codes() {
        let parse = |s: &str| serde_json::from_str::<Position>(&format!("\"{s}\""));
        assert_eq!(parse("C").unwrap(), Position::Forward);
        assert_eq!(parse("l").unwrap(), Position::Forward);
        assert_eq!(parse("D").unwrap(), Position::Defense);
        assert_eq!(parse("G").unwrap(), Position::Goalie);
        assert!(parse("X").is_err());
        assert_eq!(serde_json::to_string(&Position::Defense).unwrap(), "\"D\"");
    }

    #[test]
    fn test_player_record_defaults() {
        let json = r#"{
            "player_id": "8478402",
            "name": "Connor McDavid",
            "team": "EDM",
            "season": "2022-2023",
            "position": "C",
            "games_played": 82,
            "icetime": 104960.0,
            "points": 153,
            "game_score": 2.1
        }"#;
        let record: PlayerSeasonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.situation, Situation::All);
        assert_eq!(record.position, Position::Forward);
        assert!(record.goals_saved_above_expected().is_none());
        assert!((record.icetime_per_game() - 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_goalie_gsax() {
        let record = PlayerSeasonRecord {
            player_id: "1".to_owned(),
            name: "Goalie".to_owned(),
            team: TeamCode::new("BOS"),
            season: Season::new(2022),
            position: Position::Goalie,
            situation: Situation::All,
            games_played: 50,
            icetime: 180_000.0,
            points: 0,
            game_score: 0.0,
            expected_goals_against: Some(130.5),
            goals_against: Some(110.0),
        };
        assert_eq!(record.goals_saved_above_expected(), Some(20.5));
    }

    #[test]
    fn test_zero_games_rates() {
        let record = PlayerSeasonRecord {
            player_id: "2".to_owned(),
            name: "Call-up".to_owned(),
            team: TeamCode::new("BOS"),
            season: Season::new(2022),
            position: Position::Defense,
            situation: Situation::All,
            games_played: 0,
            icetime: 0.0,
            points: 0,
            game_score: 0.0,
            expected_goals_against: None,
            goals_against: None,
        };
        assert_eq!(record.icetime_per_game(), 0.0);
        assert_eq!(record.points_per_game(), 0.0);
    }
}
