//! Genetic search over bounded weight vectors.
//!
//! Each generation is a [`Population`] of evaluated trials. The next
//! generation is built by [`PopulationEvolver`]:
//!
//! 1. **Elite Selection** - The best `elite_count` weight vectors are carried
//!    over unchanged
//! 2. **Tournament Selection** - Parents are the best of `tournament_size`
//!    randomly chosen individuals
//! 3. **Crossover (BLX-α)** - Two parents blend into one child
//! 4. **Mutation** - Gaussian noise is added to each weight with probability
//!    `mutation_rate`
//!
//! Every child weight is clamped into its feature's bound, so the search
//! never proposes weights outside the configured ranges.
//!
//! Carried-over elites are graded again as new trials. Grading is
//! deterministic, so they keep their fitness, and since ties go to the
//! earlier trial the original trial stays the reported one.
//!
//! # Example
//!
//! ```rust,ignore
//! let evolver = GeneticParams::default().evolver()?;
//! let mut population = Population::evaluate(&dataset, 0, initial);
//! for _ in 0..generations {
//!     let next = evolver.evolve(&population, 30, &bounds, &mut rng);
//!     population = Population::evaluate(&dataset, next_trial, next);
//! }
//! ```

use std::cmp::Ordering;

use cupcast_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::IndexedRandom};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::CalibrationDataset,
    objective::{self, ObjectiveBreakdown},
    weights::{self, Bound},
};

/// Tuning knobs of the genetic search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    /// Individuals per generation.
    pub population: usize,
    /// Top individuals carried over unchanged.
    pub elite_count: usize,
    /// Individuals per tournament (larger = stronger selection pressure).
    pub tournament_size: usize,
    /// Standard deviation of the Gaussian mutation noise.
    pub mutation_sigma: f64,
    /// Range expansion of BLX-α crossover.
    pub blx_alpha: f64,
    /// Probability of mutating each weight.
    pub mutation_rate: f64,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population: 30,
            elite_count: 3,
            tournament_size: 2,
            mutation_sigma: 0.5,
            blx_alpha: 0.5,
            mutation_rate: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid genetic parameters: {reason}")]
pub struct InvalidGeneticParams {
    pub reason: &'static str,
}

impl GeneticParams {
    /// # Errors
    ///
    /// Fails if the parameters cannot produce a next generation.
    pub fn evolver(&self) -> Result<PopulationEvolver, InvalidGeneticParams> {
        let invalid = |reason| -> Result<PopulationEvolver, _> {
            Err(InvalidGeneticParams { reason })
        };
        if self.population == 0 {
            return invalid("population must not be empty");
        }
        if self.elite_count >= self.population {
            return invalid("elite count must be smaller than the population");
        }
        if self.tournament_size == 0 {
            return invalid("tournament size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid("mutation rate must be within [0, 1]");
        }
        if !self.blx_alpha.is_finite() || self.blx_alpha < 0.0 {
            return invalid("BLX-α must be a non-negative number");
        }
        let Ok(mutation) = Normal::new(0.0, self.mutation_sigma) else {
            return invalid("mutation sigma must be a non-negative number");
        };
        Ok(PopulationEvolver {
            elite_count: self.elite_count,
            tournament_size: self.tournament_size,
            mutation,
            blx_alpha: self.blx_alpha,
            mutation_rate: self.mutation_rate,
        })
    }
}

/// One evaluated trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    trial: usize,
    weights: Vec<f64>,
    breakdown: ObjectiveBreakdown,
    fitness: f64,
}

impl Individual {
    /// Zero-based index of the trial in proposal order.
    #[must_use]
    pub fn trial(&self) -> usize {
        self.trial
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn breakdown(&self) -> &ObjectiveBreakdown {
        &self.breakdown
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Orders better individuals first: higher fitness, then earlier trial.
    #[must_use]
    pub fn ranking(&self, other: &Self) -> Ordering {
        other
            .fitness
            .total_cmp(&self.fitness)
            .then(self.trial.cmp(&other.trial))
    }
}

/// Evaluated individuals of one generation, best first.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Grades `candidates` in parallel. Candidate `i` becomes trial
    /// `first_trial + i`.
    #[must_use]
    pub fn evaluate(
        dataset: &CalibrationDataset,
        first_trial: usize,
        candidates: Vec<Vec<f64>>,
    ) -> Self {
        let breakdowns = objective::evaluate_all(dataset, &candidates);
        let mut individuals = candidates
            .into_iter()
            .zip(breakdowns)
            .enumerate()
            .map(|(i, (weights, breakdown))| Individual {
                trial: first_trial + i,
                weights,
                fitness: breakdown.fitness(),
                breakdown,
            })
            .collect::<Vec<_>>();
        individuals.sort_by(Individual::ranking);
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Returns `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.individuals.iter().map(|ind| ind.fitness))
    }
}

/// Builds the weight vectors of the next generation.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    elite_count: usize,
    tournament_size: usize,
    mutation: Normal<f64>,
    blx_alpha: f64,
    mutation_rate: f64,
}

impl PopulationEvolver {
    /// Proposes `size` weight vectors: the elites of `population` followed by
    /// bred children.
    pub fn evolve<R>(
        &self,
        population: &Population,
        size: usize,
        bounds: &[Bound],
        rng: &mut R,
    ) -> Vec<Vec<f64>>
    where
        R: Rng + ?Sized,
    {
        let mut next = population
            .individuals
            .iter()
            .take(self.elite_count.min(size))
            .map(|ind| ind.weights.clone())
            .collect::<Vec<_>>();

        while next.len() < size {
            let p1 = tournament_select(&population.individuals, self.tournament_size, rng);
            let p2 = tournament_select(&population.individuals, self.tournament_size, rng);
            let (Some(p1), Some(p2)) = (p1, p2) else {
                next.push(weights::random(rng, bounds));
                continue;
            };
            let mut child =
                weights::blx_alpha(&p1.weights, &p2.weights, self.blx_alpha, bounds, rng);
            weights::mutate(&mut child, &self.mutation, self.mutation_rate, bounds, rng);
            next.push(child);
        }
        next
    }
}

/// Best of `tournament_size` randomly chosen individuals, or `None` if
/// `population` is empty.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size)
        .min_by(|a, b| a.ranking(b))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::objective::tests::perfect_dataset;

    #[test]
    fn test_invalid_params() {
        let elites = GeneticParams {
            elite_count: 30,
            ..GeneticParams::default()
        };
        assert!(elites.evolver().is_err());
        let rate = GeneticParams {
            mutation_rate: 1.5,
            ..GeneticParams::default()
        };
        assert!(rate.evolver().is_err());
        let sigma = GeneticParams {
            mutation_sigma: f64::NAN,
            ..GeneticParams::default()
        };
        assert!(sigma.evolver().is_err());
        assert!(GeneticParams::default().evolver().is_ok());
    }

    #[test]
    fn test_population_is_sorted_best_first() {
        let dataset = perfect_dataset(2);
        let population = Population::evaluate(
            &dataset,
            10,
            vec![vec![-1.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]],
        );
        let trials = population
            .individuals()
            .iter()
            .map(Individual::trial)
            .collect::<Vec<_>>();
        // Trials 11 and 12 tie; the earlier one ranks first.
        assert_eq!(trials, [11, 12, 10]);
        assert_eq!(population.best().unwrap().weights(), [1.0, 0.0]);
        let stats = population.compute_fitness_stats().unwrap();
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_evolve_keeps_elites_and_bounds() {
        let dataset = perfect_dataset(2);
        let bounds = [Bound::new(-2.0, 2.0), Bound::new(0.0, 0.5)];
        let mut rng = Pcg64::seed_from_u64(3);
        let initial = (0..8).map(|_| weights::random(&mut rng, &bounds)).collect();
        let population = Population::evaluate(&dataset, 0, initial);

        let params = GeneticParams {
            population: 8,
            elite_count: 2,
            mutation_sigma: 3.0,
            mutation_rate: 0.5,
            blx_alpha: 2.0,
            ..GeneticParams::default()
        };
        let evolver = params.evolver().unwrap();
        let next = evolver.evolve(&population, 8, &bounds, &mut rng);
        assert_eq!(next.len(), 8);
        assert_eq!(next[0], population.individuals()[0].weights());
        assert_eq!(next[1], population.individuals()[1].weights());
        for weights in &next {
            assert!(weights.iter().zip(&bounds).all(|(w, b)| b.contains(*w)));
        }

        // A truncated generation still starts with the best elite.
        let short = evolver.evolve(&population, 1, &bounds, &mut rng);
        assert_eq!(short, [population.individuals()[0].weights().to_vec()]);
    }
}
