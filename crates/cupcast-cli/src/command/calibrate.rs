use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use cupcast_analysis::sample::LabeledSamples;
use cupcast_evaluator::scorer::FeatureNormalizer;
use cupcast_league::ResultPopulation;
use cupcast_training::{
    dataset::CalibrationDataset,
    genetic::GeneticParams,
    search::{CalibrationConfig, Calibrator, SearchStrategy},
    weights::WeightBounds,
};
use tracing::{info, warn};

use crate::{model::ScoringModel, util};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum StrategyKind {
    Random,
    Genetic,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CalibrateArg {
    /// Feature table produced by `extract-features`
    #[arg(long)]
    features: PathBuf,
    /// Baseline table produced by `build-baselines`
    #[arg(long)]
    baselines: PathBuf,
    /// Playoff records (JSON array)
    #[arg(long)]
    playoffs: PathBuf,
    /// Baseline to standardize against
    #[arg(long, default_value = "all")]
    population: ResultPopulation,
    /// Per-feature weight bounds file (defaults to the tuned bounds)
    #[arg(long)]
    bounds: Option<PathBuf>,
    /// Search configuration file; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of weight vectors to evaluate
    #[arg(long)]
    trials: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    strategy: Option<StrategyKind>,
    /// Minimum improvement over the first trial to count as converged
    #[arg(long)]
    noise_floor: Option<f64>,
    /// Model name
    #[arg(long, default_value = "contender")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CalibrateArg) -> anyhow::Result<()> {
    let table = util::read_feature_table_file(&arg.features)?;
    let baselines = util::read_baseline_file(&arg.baselines)?;
    let results = util::read_playoffs_file(&arg.playoffs)?;
    let features = table.features()?;

    let baseline = baselines.get(arg.population)?;
    let normalizer = FeatureNormalizer::new(&features, baseline).with_context(|| {
        format!("Failed to standardize against baseline '{}'", arg.population)
    })?;
    let labeled = LabeledSamples::new(&table.rows, &results);
    for season in &labeled.unlabeled_seasons {
        warn!(%season, "no playoff results; season left out of calibration");
    }
    let dataset = CalibrationDataset::new(&labeled.samples, &normalizer)
        .context("Failed to build calibration dataset")?;

    let bounds = match &arg.bounds {
        Some(path) => util::read_json_file("weight bounds", path)?,
        None => WeightBounds::tuned(),
    };
    let config = search_config(arg)?;
    let outcome = Calibrator::new(&dataset, &bounds)?.run(&config)?;
    if !outcome.converged {
        warn!(
            fitness = outcome.fitness,
            first_fitness = outcome.first_fitness,
            "calibration did not improve on its first trial"
        );
    }
    info!(
        champion_hits = outcome.breakdown.champion_hits,
        seasons = outcome.breakdown.seasons,
        finalists_top2 = outcome.breakdown.finalists_top2,
        semifinalists_top4 = outcome.breakdown.semifinalists_top4,
        round_winners_top8 = outcome.breakdown.round_winners_top8,
        champion_rank_penalty = outcome.breakdown.champion_rank_penalty,
        "best objective"
    );

    let model = ScoringModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        feature_set: table.feature_set,
        population: arg.population,
        fitness: outcome.fitness,
        objective: outcome.breakdown,
        trials: outcome.trials,
        converged: outcome.converged,
        weights: outcome.weights,
    };
    util::save_json(&model, arg.output.as_deref())?;
    Ok(())
}

fn search_config(arg: &CalibrateArg) -> anyhow::Result<CalibrationConfig> {
    let mut config: CalibrationConfig = match &arg.config {
        Some(path) => util::read_json_file("search config", path)?,
        None => CalibrationConfig::default(),
    };
    if let Some(trials) = arg.trials {
        config.trials = trials;
    }
    if let Some(seed) = arg.seed {
        config.seed = seed;
    }
    if let Some(noise_floor) = arg.noise_floor {
        config.noise_floor = noise_floor;
    }
    match (arg.strategy, &config.strategy) {
        (Some(StrategyKind::Random), _) => config.strategy = SearchStrategy::Random,
        (Some(StrategyKind::Genetic), SearchStrategy::Random) => {
            config.strategy = SearchStrategy::Genetic(GeneticParams::default());
        }
        (Some(StrategyKind::Genetic), SearchStrategy::Genetic(_)) | (None, _) => {}
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        arg: CalibrateArg,
    }

    fn parse(extra: &[&str]) -> CalibrateArg {
        let base = [
            "cupcast",
            "--features",
            "f.json",
            "--baselines",
            "b.json",
            "--playoffs",
            "p.json",
        ];
        Cli::parse_from(base.iter().chain(extra)).arg
    }

    #[test]
    fn test_flags_override_defaults() {
        let arg = parse(&["--trials", "40", "--seed", "7", "--strategy", "genetic"]);
        let config = search_config(&arg).unwrap();
        assert_eq!(config.trials, 40);
        assert_eq!(config.seed, 7);
        assert_eq!(config.strategy, SearchStrategy::Genetic(GeneticParams::default()));

        let config = search_config(&parse(&[])).unwrap();
        assert_eq!(config, CalibrationConfig::default());
    }

    #[test]
    fn test_population_flag() {
        let arg = parse(&["--population", "at-least-3"]);
        assert_eq!(arg.population, ResultPopulation::AtLeast(3));
        assert_eq!(parse(&[]).population, ResultPopulation::All);
    }
}
