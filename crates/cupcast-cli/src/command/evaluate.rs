use std::{collections::BTreeMap, path::PathBuf};

use cupcast_analysis::report::EvaluationReport;
use cupcast_evaluator::scorer::ScoredTeam;
use cupcast_league::Season;
use tracing::info;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Ranked scores produced by `score`
    #[arg(long)]
    scores: PathBuf,
    /// Playoff records (JSON array)
    #[arg(long)]
    playoffs: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let ranked: BTreeMap<Season, Vec<ScoredTeam>> = util::read_json_file("scores", &arg.scores)?;
    let results = util::read_playoffs_file(&arg.playoffs)?;

    let report = EvaluationReport::build(&ranked, &results);
    info!(
        seasons = report.seasons.len(),
        champion_mean_rank = report.score.champion_mean_rank,
        standings_champion_mean_rank = report
            .standings
            .as_ref()
            .and_then(|s| s.champion_mean_rank),
        "evaluation finished"
    );
    for cutoff in &report.score.success {
        info!(
            rank_cutoff = cutoff.rank_cutoff,
            min_rounds = cutoff.min_rounds,
            teams = cutoff.teams,
            rate = cutoff.rate(),
            "success rate"
        );
    }

    util::save_json(&report, arg.output.as_deref())?;
    Ok(())
}
