use clap::{Parser, Subcommand};

use self::{
    build_baselines::BuildBaselinesArg, calibrate::CalibrateArg, evaluate::EvaluateArg,
    extract_features::ExtractFeaturesArg, score::ScoreArg,
};

mod build_baselines;
mod calibrate;
mod evaluate;
mod extract_features;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Extract team feature vectors from player and team tables
    ExtractFeatures(#[clap(flatten)] ExtractFeaturesArg),
    /// Compute baseline distributions per playoff-result group
    BuildBaselines(#[clap(flatten)] BuildBaselinesArg),
    /// Rank every season by contender score
    Score(#[clap(flatten)] ScoreArg),
    /// Search feature weights against historical playoff results
    Calibrate(#[clap(flatten)] CalibrateArg),
    /// Compare a score ranking with playoff results
    Evaluate(#[clap(flatten)] EvaluateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::ExtractFeatures(arg) => extract_features::run(&arg)?,
        Mode::BuildBaselines(arg) => build_baselines::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Calibrate(arg) => calibrate::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
    }
    Ok(())
}
