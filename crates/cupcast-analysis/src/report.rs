//! How well a season ranking predicts playoff success.
//!
//! The report compares two rankings of each season's playoff qualifiers:
//! the contender-score ranking and, when standings ranks are recorded, the
//! regular-season standings. Both are re-ranked 1..=n among qualifiers so the
//! two are directly comparable.
//!
//! For each ranking it reports:
//!
//! - the mean rank of the eventual champions
//! - the mean rank of teams grouped by rounds won (0 to 4)
//! - for each [`SUCCESS_CUTOFFS`] entry `(k, r)`, the share of teams ranked
//!   in the top `k` that won at least `r` rounds

use std::collections::BTreeMap;

use cupcast_evaluator::scorer::ScoredTeam;
use cupcast_league::{CHAMPION_ROUNDS, PlayoffResult, PlayoffResults, Season, TeamCode};
use serde::{Deserialize, Serialize};

/// `(rank cutoff, minimum rounds won)` pairs evaluated by the report.
pub const SUCCESS_CUTOFFS: [(u32, u8); 4] = [(8, 1), (4, 2), (2, 3), (1, CHAMPION_ROUNDS)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Seasons that had both scores and playoff results.
    pub seasons: Vec<Season>,
    pub score: RankingSummary,
    /// `None` if no standings ranks were recorded.
    pub standings: Option<RankingSummary>,
}

/// Accuracy of one ranking over all evaluated seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSummary {
    pub champion_mean_rank: Option<f64>,
    pub by_result: Vec<ResultRankSummary>,
    pub success: Vec<CutoffSuccess>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRankSummary {
    pub rounds_won: u8,
    pub teams: usize,
    pub mean_rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffSuccess {
    pub rank_cutoff: u32,
    pub min_rounds: u8,
    /// Teams ranked inside the cutoff.
    pub teams: usize,
    /// Of those, teams that won at least `min_rounds` rounds.
    pub successes: usize,
}

impl CutoffSuccess {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn rate(&self) -> Option<f64> {
        (self.teams > 0).then(|| self.successes as f64 / self.teams as f64)
    }
}

/// Qualifier ranks of one ranking in one season.
type SeasonRanks = Vec<(u32, PlayoffResult)>;

impl EvaluationReport {
    /// Builds the report from ranked seasons and playoff results.
    ///
    /// Seasons missing from `results` are skipped.
    #[must_use]
    pub fn build(ranked: &BTreeMap<Season, Vec<ScoredTeam>>, results: &PlayoffResults) -> Self {
        let mut seasons = vec![];
        let mut score_ranks = vec![];
        let mut standings_ranks = vec![];
        for (season, teams) in ranked {
            if !results.contains_season(*season) {
                continue;
            }
            seasons.push(*season);

            let qualifiers = teams
                .iter()
                .filter_map(|t| {
                    let result = results.result(*season, &t.team).ok()?;
                    result.qualified().then_some((t, result))
                })
                .collect::<Vec<_>>();

            let mut by_score = qualifiers.clone();
            by_score.sort_by(|(a, _), (b, _)| {
                b.score.total_cmp(&a.score).then_with(|| a.team.cmp(&b.team))
            });
            score_ranks.push(ordinal(by_score.iter().map(|(_, result)| *result)));

            let mut by_standings = qualifiers
                .iter()
                .filter_map(|(t, result)| {
                    let rank = results.standings_rank(*season, &t.team)?;
                    Some((rank, &t.team, *result))
                })
                .collect::<Vec<(u32, &TeamCode, PlayoffResult)>>();
            if !by_standings.is_empty() {
                by_standings.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
                standings_ranks.push(ordinal(by_standings.iter().map(|(_, _, result)| *result)));
            }
        }

        let standings = (!standings_ranks.is_empty()).then(|| summarize(&standings_ranks));
        Self {
            seasons,
            score: summarize(&score_ranks),
            standings,
        }
    }
}

fn ordinal<I>(results: I) -> SeasonRanks
where
    I: IntoIterator<Item = PlayoffResult>,
{
    results.into_iter().zip(1..).map(|(r, rank)| (rank, r)).collect()
}

fn summarize(seasons: &[SeasonRanks]) -> RankingSummary {
    let teams = || seasons.iter().flatten();

    let champion_mean_rank = mean(teams().filter(|(_, r)| r.is_champion()).map(|(rank, _)| *rank));
    let by_result = (0..=CHAMPION_ROUNDS)
        .map(|rounds| {
            let ranks = teams()
                .filter(|(_, r)| r.won_exactly(rounds))
                .map(|(rank, _)| *rank)
                .collect::<Vec<_>>();
            ResultRankSummary {
                rounds_won: rounds,
                teams: ranks.len(),
                mean_rank: mean(ranks),
            }
        })
        .collect();
    let success = SUCCESS_CUTOFFS
        .iter()
        .map(|&(rank_cutoff, min_rounds)| {
            let inside = teams().filter(|(rank, _)| *rank <= rank_cutoff);
            let (teams, successes) = inside.fold((0, 0), |(n, s), (_, r)| {
                (n + 1, s + usize::from(r.won_at_least(min_rounds)))
            });
            CutoffSuccess {
                rank_cutoff,
                min_rounds,
                teams,
                successes,
            }
        })
        .collect();

    RankingSummary {
        champion_mean_rank,
        by_result,
        success,
    }
}

#[expect(clippy::cast_precision_loss)]
fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = u32>,
{
    let (count, sum) = values
        .into_iter()
        .fold((0_usize, 0.0), |(n, s), v| (n + 1, s + f64::from(v)));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use cupcast_league::PlayoffRecord;

    use super::*;

    fn scored(season: Season, entries: &[(&str, f64)]) -> Vec<ScoredTeam> {
        entries
            .iter()
            .zip(1..)
            .map(|((team, score), rank)| ScoredTeam {
                team: TeamCode::new(*team),
                season,
                score: *score,
                rank,
            })
            .collect()
    }

    fn record(season: Season, team: &str, result: i8, standings: Option<u32>) -> PlayoffRecord {
        PlayoffRecord {
            season,
            team: TeamCode::new(team),
            result: PlayoffResult::try_from(result).unwrap(),
            standings_rank: standings,
        }
    }

    #[test]
    fn test_report_over_two_seasons() {
        let s1 = Season::new(2021);
        let s2 = Season::new(2022);
        let mut ranked = BTreeMap::new();
        // NON missed the playoffs and is ignored even though it scores best.
        ranked.insert(
            s1,
            scored(s1, &[("NON", 9.0), ("AAA", 5.0), ("BBB", 3.0), ("CCC", 1.0), ("DDD", 0.0)]),
        );
        ranked.insert(
            s2,
            scored(s2, &[("AAA", 5.0), ("BBB", 4.0), ("CCC", 2.0), ("DDD", 1.0)]),
        );
        let results = PlayoffResults::from_records([
            record(s1, "AAA", 4, Some(3)),
            record(s1, "BBB", 3, Some(1)),
            record(s1, "CCC", 0, Some(2)),
            record(s1, "DDD", 1, Some(4)),
            record(s2, "AAA", 3, None),
            record(s2, "BBB", 0, None),
            record(s2, "CCC", 4, None),
            record(s2, "DDD", 1, None),
        ]);

        let report = EvaluationReport::build(&ranked, &results);
        assert_eq!(report.seasons, [s1, s2]);

        // Champions ranked 1 (AAA in s1) and 3 (CCC in s2).
        assert_eq!(report.score.champion_mean_rank, Some(2.0));
        let zero = &report.score.by_result[0];
        assert_eq!((zero.teams, zero.mean_rank), (2, Some(2.5)));

        // Top 1 won the cup in one of two seasons.
        let cup = report.score.success.iter().find(|c| c.rank_cutoff == 1).unwrap();
        assert_eq!((cup.teams, cup.successes), (2, 1));
        assert_eq!(cup.rate(), Some(0.5));
        // Top 2 won at least three rounds three times out of four.
        let finals = report.score.success.iter().find(|c| c.rank_cutoff == 2).unwrap();
        assert_eq!((finals.teams, finals.successes), (4, 3));

        // Standings only exist for s1; AAA (standings 3) was the champion.
        let standings = report.standings.unwrap();
        assert_eq!(standings.champion_mean_rank, Some(3.0));
    }

    #[test]
    fn test_seasons_without_results_are_skipped() {
        let season = Season::new(2024);
        let mut ranked = BTreeMap::new();
        ranked.insert(season, scored(season, &[("AAA", 1.0)]));
        let report = EvaluationReport::build(&ranked, &PlayoffResults::default());
        assert!(report.seasons.is_empty());
        assert_eq!(report.score.champion_mean_rank, None);
        assert!(report.standings.is_none());
        assert!(report.score.success.iter().all(|c| c.rate().is_none()));
    }
}
