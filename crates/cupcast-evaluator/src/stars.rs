//! League-wide star classification by points per game.

use cupcast_league::{PlayerSeasonRecord, Position, StarThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarLevel {
    Superstar,
    Star,
}

/// Points-per-game leaderboards of one season.
///
/// Only skaters meeting the games-played floor are ranked. Ranks use the
/// "min" method: tied players share the best rank of their group.
#[derive(Debug, Clone)]
pub struct StarClassifier {
    thresholds: StarThresholds,
    min_games: u32,
    // points per game, sorted descending
    forwards: Vec<f64>,
    defense: Vec<f64>,
}

impl StarClassifier {
    pub fn new<'a, I>(league_players: I, min_games: u32, thresholds: StarThresholds) -> Self
    where
        I: IntoIterator<Item = &'a PlayerSeasonRecord>,
    {
        let mut forwards = vec![];
        let mut defense = vec![];
        for player in league_players {
            if player.games_played < min_games {
                continue;
            }
            match player.position {
                Position::Forward => forwards.push(player.points_per_game()),
                Position::Defense => defense.push(player.points_per_game()),
                Position::Goalie => {}
            }
        }
        forwards.sort_by(|a, b| b.total_cmp(a));
        defense.sort_by(|a, b| b.total_cmp(a));
        Self {
            thresholds,
            min_games,
            forwards,
            defense,
        }
    }

    /// League rank of `player` among skaters of the same position, or `None`
    /// for goalies and players below the floor.
    #[must_use]
    pub fn rank(&self, player: &PlayerSeasonRecord) -> Option<u32> {
        if player.games_played < self.min_games {
            return None;
        }
        let board = match player.position {
            Position::Forward => &self.forwards,
            Position::Defense => &self.defense,
            Position::Goalie => return None,
        };
        let ppg = player.points_per_game();
        let better = board.partition_point(|v| *v > ppg);
        u32::try_from(better + 1).ok()
    }

    #[must_use]
    pub fn classify(&self, player: &PlayerSeasonRecord) -> Option<StarLevel> {
        let rank = self.rank(player)?;
        let (superstar, star) = match player.position {
            Position::Forward => (
                self.thresholds.forward_superstar,
                self.thresholds.forward_star,
            ),
            Position::Defense => (
                self.thresholds.defense_superstar,
                self.thresholds.defense_star,
            ),
            Position::Goalie => return None,
        };
        if rank <= superstar {
            Some(StarLevel::Superstar)
        } else if rank <= star {
            Some(StarLevel::Star)
        } else {
            None
        }
    }
}
