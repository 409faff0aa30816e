use std::path::PathBuf;

use anyhow::{Context as _, bail};
use cupcast_evaluator::scorer::{CompositeScorer, WeightVector};
use cupcast_league::ResultPopulation;
use tracing::{info, warn};

use crate::{model::ScoringModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Feature table produced by `extract-features`
    #[arg(long)]
    features: PathBuf,
    /// Baseline table produced by `build-baselines`
    #[arg(long)]
    baselines: PathBuf,
    /// Scoring model produced by `calibrate` (uniform weights if omitted)
    #[arg(long)]
    model: Option<PathBuf>,
    /// Baseline to standardize against (defaults to the model's, or `all`)
    #[arg(long)]
    population: Option<ResultPopulation>,
    /// Weight of every feature when no model is given
    #[arg(long, default_value_t = 1.0)]
    weight: f64,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let table = util::read_feature_table_file(&arg.features)?;
    let baselines = util::read_baseline_file(&arg.baselines)?;
    let features = table.features()?;

    let (weights, model_population) = match &arg.model {
        Some(path) => {
            let model = ScoringModel::open(path)?;
            if model.feature_set != table.feature_set {
                bail!(
                    "Model {} was calibrated on a different feature set than {}",
                    path.display(),
                    arg.features.display()
                );
            }
            info!(name = %model.name, trained_at = %model.trained_at, "model loaded");
            (model.weights, Some(model.population))
        }
        None => (WeightVector::uniform(&table.feature_ids, arg.weight), None),
    };
    let population = arg
        .population
        .or(model_population)
        .unwrap_or(ResultPopulation::All);

    let baseline = baselines.get(population)?;
    let scorer = CompositeScorer::new(&features, baseline, &weights)
        .with_context(|| format!("Failed to build scorer against baseline '{population}'"))?;
    let ranked = scorer.rank_table(&table);
    for failure in &ranked.failures {
        warn!(%failure, "team-season not scored");
    }
    for (season, teams) in &ranked.seasons {
        if let Some(top) = teams.first() {
            info!(%season, team = %top.team, score = top.score, "top contender");
        }
    }

    util::save_json(&ranked.seasons, arg.output.as_deref())?;
    Ok(())
}
