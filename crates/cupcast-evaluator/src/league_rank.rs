//! League-wide ordinal ranking of team statistics.

use std::{cmp::Ordering, collections::BTreeMap};

use cupcast_league::TeamCode;

/// Direction in which a statistic is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Largest value is rank 1 (goals for).
    HighestFirst,
    /// Smallest value is rank 1 (goals against).
    LowestFirst,
}

/// Assigns 1-based ranks to `entries`.
///
/// Every team gets a distinct rank. Equal values are ordered alphabetically
/// by team code, so the result does not depend on input order.
///
/// # Examples
///
/// ```
/// use cupcast_evaluator::league_rank::{RankOrder, league_ranks};
/// use cupcast_league::TeamCode;
///
/// let (bos, tor) = (TeamCode::new("BOS"), TeamCode::new("TOR"));
/// let ranks = league_ranks([(&tor, 210.0), (&bos, 230.0)], RankOrder::HighestFirst);
/// assert_eq!(ranks[&bos], 1);
/// assert_eq!(ranks[&tor], 2);
/// ```
pub fn league_ranks<'a, I>(entries: I, order: RankOrder) -> BTreeMap<TeamCode, u32>
where
    I: IntoIterator<Item = (&'a TeamCode, f64)>,
{
    let mut entries = entries.into_iter().collect::<Vec<_>>();
    entries.sort_by(|(a_team, a), (b_team, b)| {
        let by_value = match order {
            RankOrder::HighestFirst => b.total_cmp(a),
            RankOrder::LowestFirst => a.total_cmp(b),
        };
        by_value.then_with(|| a_team.cmp(b_team))
    });
    entries
        .into_iter()
        .zip(1..)
        .map(|((team, _), rank)| (team.clone(), rank))
        .collect()
}

/// Compares two scores so that higher scores sort first and ties fall back
/// to the team code.
pub fn descending_with_team(a: (f64, &TeamCode), b: (f64, &TeamCode)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(names: &[&str]) -> Vec<TeamCode> {
        names.iter().map(|n| TeamCode::new(*n)).collect()
    }

    #[test]
    fn test_ties_broken_by_team_code() {
        let teams = codes(&["TOR", "BOS", "MTL"]);
        let ranks = league_ranks(
            [(&teams[0], 50.0), (&teams[1], 50.0), (&teams[2], 40.0)],
            RankOrder::LowestFirst,
        );
        assert_eq!(ranks[&teams[2]], 1);
        assert_eq!(ranks[&teams[1]], 2);
        assert_eq!(ranks[&teams[0]], 3);
    }

    #[test]
    fn test_reranking_is_idempotent() {
        let teams = codes(&["ANA", "BOS", "CAR", "DAL", "EDM"]);
        let values = [180.0, 221.0, 221.0, 150.5, 260.0];
        let ranks = league_ranks(
            teams.iter().zip(values),
            RankOrder::HighestFirst,
        );
        let reranked = league_ranks(
            ranks.iter().map(|(team, rank)| (team, f64::from(*rank))),
            RankOrder::LowestFirst,
        );
        assert_eq!(ranks, reranked);
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let teams = codes(&["A", "B", "C", "D"]);
        let ranks = league_ranks(teams.iter().zip([1.0, 1.0, 1.0, 1.0]), RankOrder::HighestFirst);
        let mut seen = ranks.values().copied().collect::<Vec<_>>();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }
}
