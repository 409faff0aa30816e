//! Grading of one weight vector over the calibration seasons.
//!
//! In each season the qualifiers are ranked by contender score (ties by team
//! code) and the ranking is graded on four nested questions:
//!
//! | Question                                   | Weight      |
//! |--------------------------------------------|-------------|
//! | Is the champion ranked first?              | 1,000,000   |
//! | How many of the top 2 won at least 3 rounds? | 10,000    |
//! | How many of the top 4 won at least 2 rounds? | 100       |
//! | How many of the top 8 won at least 1 round?  | 1         |
//!
//! The weights make every champion hit worth more than any number of
//! finalist hits over a realistic season count, and so on down. The mean of
//! `champion rank - 1` over seasons with a champion is subtracted, so among
//! equal counts the ranking that keeps champions closer to the top wins.

use std::{num::NonZeroUsize, thread};

use cupcast_league::PlayoffResult;
use serde::{Deserialize, Serialize};

use crate::dataset::{CalibrationDataset, SeasonSamples};

const CHAMPION_HIT_WEIGHT: f64 = 1_000_000.0;
const FINALIST_WEIGHT: f64 = 10_000.0;
const SEMIFINALIST_WEIGHT: f64 = 100.0;
const ROUND_WINNER_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBreakdown {
    pub seasons: usize,
    /// Seasons whose champion is among the qualifiers.
    pub champion_seasons: usize,
    pub champion_hits: usize,
    /// Teams ranked in the top 2 that won at least 3 rounds.
    pub finalists_top2: usize,
    /// Teams ranked in the top 4 that won at least 2 rounds.
    pub semifinalists_top4: usize,
    /// Teams ranked in the top 8 that won at least 1 round.
    pub round_winners_top8: usize,
    /// Mean of `champion rank - 1`.
    pub champion_rank_penalty: f64,
}

impl ObjectiveBreakdown {
    /// Grades `weights` over every season of `dataset`.
    ///
    /// `weights` must have one entry per dataset feature.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(dataset: &CalibrationDataset, weights: &[f64]) -> Self {
        let mut breakdown = Self::default();
        let mut rank_sum = 0;
        for season in dataset.seasons() {
            breakdown.seasons += 1;
            for (rank, result) in ranked_results(season, weights) {
                breakdown.finalists_top2 += usize::from(rank <= 2 && result.won_at_least(3));
                breakdown.semifinalists_top4 += usize::from(rank <= 4 && result.won_at_least(2));
                breakdown.round_winners_top8 += usize::from(rank <= 8 && result.won_at_least(1));
                if result.is_champion() {
                    breakdown.champion_seasons += 1;
                    breakdown.champion_hits += usize::from(rank == 1);
                    rank_sum += rank - 1;
                }
            }
        }
        if breakdown.champion_seasons > 0 {
            breakdown.champion_rank_penalty = rank_sum as f64 / breakdown.champion_seasons as f64;
        }
        breakdown
    }

    /// The scalar the search maximizes.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fitness(&self) -> f64 {
        CHAMPION_HIT_WEIGHT * self.champion_hits as f64
            + FINALIST_WEIGHT * self.finalists_top2 as f64
            + SEMIFINALIST_WEIGHT * self.semifinalists_top4 as f64
            + ROUND_WINNER_WEIGHT * self.round_winners_top8 as f64
            - self.champion_rank_penalty
    }
}

fn ranked_results(
    season: &SeasonSamples,
    weights: &[f64],
) -> impl Iterator<Item = (usize, PlayoffResult)> {
    let scores = season
        .z_scores
        .iter()
        .map(|z| z.iter().zip(weights).map(|(z, w)| z * w).sum::<f64>())
        .collect::<Vec<_>>();
    let mut order = (0..scores.len()).collect::<Vec<_>>();
    // Teams are in code order, so the index breaks ties alphabetically.
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order
        .into_iter()
        .zip(1..)
        .map(|(i, rank)| (rank, season.results[i]))
}

/// Grades every candidate in parallel, one chunk per available core.
///
/// The output is in the order of `candidates`.
#[must_use]
pub fn evaluate_all(
    dataset: &CalibrationDataset,
    candidates: &[Vec<f64>],
) -> Vec<ObjectiveBreakdown> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_size = candidates.len().div_ceil(workers).max(1);
    let mut breakdowns = vec![ObjectiveBreakdown::default(); candidates.len()];
    thread::scope(|s| {
        for (out, input) in breakdowns
            .chunks_mut(chunk_size)
            .zip(candidates.chunks(chunk_size))
        {
            s.spawn(move || {
                for (breakdown, weights) in out.iter_mut().zip(input) {
                    *breakdown = ObjectiveBreakdown::evaluate(dataset, weights);
                }
            });
        }
    });
    breakdowns
}

#[cfg(test)]
pub(crate) mod tests {
    use cupcast_league::{Season, TeamCode};

    use super::*;

    /// Sixteen qualifiers per season with one feature equal to the team's
    /// strength; results follow strength exactly.
    pub(crate) fn perfect_dataset(seasons: u16) -> CalibrationDataset {
        let results: [i8; 16] = [4, 3, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        let seasons = (0..seasons)
            .map(|i| {
                let entries = results
                    .iter()
                    .enumerate()
                    .map(|(n, rounds)| {
                        let strength = 16.0 - f64::from(u8::try_from(n).unwrap());
                        (
                            TeamCode::new(format!("T{n:02}")),
                            PlayoffResult::try_from(*rounds).unwrap(),
                            vec![strength, 0.0],
                        )
                    })
                    .collect();
                SeasonSamples::new(Season::new(2000 + i), entries)
            })
            .collect();
        CalibrationDataset::from_seasons(vec!["f_1_3".to_owned(), "f_4_6".to_owned()], seasons)
            .unwrap()
    }

    #[test]
    fn test_champion_always_first() {
        let dataset = perfect_dataset(3);
        let breakdown = ObjectiveBreakdown::evaluate(&dataset, &[1.0, 0.0]);
        assert_eq!(breakdown.seasons, 3);
        assert_eq!(breakdown.champion_hits, 3);
        assert_eq!(breakdown.finalists_top2, 6);
        assert_eq!(breakdown.semifinalists_top4, 12);
        assert_eq!(breakdown.round_winners_top8, 24);
        assert_eq!(breakdown.champion_rank_penalty, 0.0);
        assert_eq!(
            breakdown.fitness(),
            3.0 * 1_000_000.0 + 6.0 * 10_000.0 + 12.0 * 100.0 + 24.0
        );
    }

    #[test]
    fn test_reversed_weights_bury_the_champion() {
        let dataset = perfect_dataset(2);
        let breakdown = ObjectiveBreakdown::evaluate(&dataset, &[-1.0, 0.0]);
        assert_eq!(breakdown.champion_hits, 0);
        assert_eq!(breakdown.finalists_top2, 0);
        assert_eq!(breakdown.champion_rank_penalty, 15.0);
        assert!(breakdown.fitness() < 0.0);
    }

    #[test]
    fn test_ties_rank_by_team_code() {
        // All scores are zero, so the ranking is alphabetical and T00, the
        // champion, comes first.
        let dataset = perfect_dataset(1);
        let breakdown = ObjectiveBreakdown::evaluate(&dataset, &[0.0, 0.0]);
        assert_eq!(breakdown.champion_hits, 1);
    }

    #[test]
    fn test_parallel_evaluation_keeps_order() {
        let dataset = perfect_dataset(2);
        let candidates = (0..37)
            .map(|i| vec![f64::from(i) - 18.0, 1.0])
            .collect::<Vec<_>>();
        let parallel = evaluate_all(&dataset, &candidates);
        let sequential = candidates
            .iter()
            .map(|w| ObjectiveBreakdown::evaluate(&dataset, w))
            .collect::<Vec<_>>();
        assert_eq!(parallel, sequential);
        assert!(evaluate_all(&dataset, &[]).is_empty());
    }
}
