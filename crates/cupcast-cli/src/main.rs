use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

mod command;
mod model;
mod util;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    command::run()
}

/// Logs to stderr so that JSON written to stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cupcast=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
