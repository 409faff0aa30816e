use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use cupcast_analysis::baseline::BaselineTable;
use cupcast_evaluator::feature_table::FeatureTable;
use cupcast_league::{LeagueConfig, PlayoffRecord, PlayoffResults};

/// Writes `value` as pretty-printed JSON to `output_path`, or to stdout when
/// no path is given.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout")?,
    }
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads the league configuration, or returns the built-in NHL one.
pub fn read_league_config(path: Option<&Path>) -> anyhow::Result<LeagueConfig> {
    match path {
        Some(path) => {
            let league: LeagueConfig = read_json_file("league config", path)?;
            league
                .validate()
                .with_context(|| format!("Invalid league config {}", path.display()))?;
            Ok(league)
        }
        None => Ok(LeagueConfig::nhl()),
    }
}

pub fn read_feature_table_file<P>(path: P) -> anyhow::Result<FeatureTable>
where
    P: AsRef<Path>,
{
    read_json_file("feature table", path)
}

pub fn read_baseline_file<P>(path: P) -> anyhow::Result<BaselineTable>
where
    P: AsRef<Path>,
{
    read_json_file("baseline table", path)
}

/// Reads a JSON array of playoff records.
pub fn read_playoffs_file<P>(path: P) -> anyhow::Result<PlayoffResults>
where
    P: AsRef<Path>,
{
    let records: Vec<PlayoffRecord> = read_json_file("playoff results", path)?;
    Ok(PlayoffResults::from_records(records))
}
