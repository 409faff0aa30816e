use std::path::PathBuf;

use cupcast_analysis::{baseline::BaselineTable, sample::LabeledSamples};
use cupcast_league::ResultPopulation;
use tracing::{info, warn};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BuildBaselinesArg {
    /// Feature table produced by `extract-features`
    #[arg(long)]
    features: PathBuf,
    /// Playoff records (JSON array)
    #[arg(long)]
    playoffs: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BuildBaselinesArg) -> anyhow::Result<()> {
    let table = util::read_feature_table_file(&arg.features)?;
    let results = util::read_playoffs_file(&arg.playoffs)?;

    let labeled = LabeledSamples::new(&table.rows, &results);
    for season in &labeled.unlabeled_seasons {
        warn!(%season, "no playoff results; season left out of baselines");
    }

    let baselines = BaselineTable::build(
        &table.feature_ids,
        &labeled.samples,
        &ResultPopulation::standard(),
    );
    for distribution in &baselines.distributions {
        if distribution.members < 2 {
            warn!(
                population = %distribution.population,
                members = distribution.members,
                "baseline has too few members to score against"
            );
        } else {
            info!(
                population = %distribution.population,
                members = distribution.members,
                "baseline computed"
            );
        }
    }

    util::save_json(&baselines, arg.output.as_deref())?;
    Ok(())
}
