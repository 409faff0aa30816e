use std::path::PathBuf;

use cupcast_evaluator::{extractor::FeatureExtractor, team_feature::FeatureSet};
use cupcast_league::{LeagueTables, PlayerSeasonRecord, TeamSeasonRecord};
use tracing::{info, warn};

use crate::util;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum FeatureSetPreset {
    /// Forward lines and defense pairs with league ranks
    #[default]
    Lines,
    /// Top and bottom halves with adjusted goal totals
    Halves,
}

impl FeatureSetPreset {
    fn feature_set(self) -> FeatureSet {
        match self {
            FeatureSetPreset::Lines => FeatureSet::lines(),
            FeatureSetPreset::Halves => FeatureSet::halves(),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExtractFeaturesArg {
    /// Player season records (JSON array)
    #[arg(long)]
    players: PathBuf,
    /// Team season records per situation (JSON array)
    #[arg(long)]
    teams: PathBuf,
    /// League configuration file (defaults to the built-in NHL configuration)
    #[arg(long)]
    league: Option<PathBuf>,
    #[arg(long, default_value = "lines")]
    feature_set: FeatureSetPreset,
    /// Add superstar and star counts to the feature set
    #[arg(long)]
    star_counts: bool,
    /// Also write the team profiles behind each feature vector
    #[arg(long)]
    profiles: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExtractFeaturesArg) -> anyhow::Result<()> {
    let league = util::read_league_config(arg.league.as_deref())?;
    let players: Vec<PlayerSeasonRecord> = util::read_json_file("players", &arg.players)?;
    let teams: Vec<TeamSeasonRecord> = util::read_json_file("teams", &arg.teams)?;
    info!(players = players.len(), teams = teams.len(), "tables loaded");

    let tables = LeagueTables::new(players, teams);
    let feature_set = arg.feature_set.feature_set().with_star_counts(arg.star_counts);
    let extractor = FeatureExtractor::new(&league, feature_set);
    let batch = extractor.extract_all(&tables);

    for season in &batch.missing_seasons {
        warn!(%season, "no player or team rows for configured season");
    }
    for error in &batch.invalid_seasons {
        warn!(%error, "season skipped");
    }
    for failure in &batch.failures {
        warn!(%failure, "team-season skipped");
    }
    let padded = batch
        .profiles
        .iter()
        .filter(|p| p.padded_forwards + p.padded_defense > 0)
        .count();
    info!(
        rows = batch.table.rows.len(),
        seasons = batch.table.seasons().len(),
        features = batch.table.feature_ids.len(),
        failures = batch.failures.len(),
        padded,
        "features extracted"
    );

    if let Some(path) = &arg.profiles {
        util::save_json(&batch.profiles, Some(path.as_path()))?;
    }
    util::save_json(&batch.table, arg.output.as_deref())?;
    Ok(())
}
