use anyhow::{Context, Result};
use clap::Parser;
use shelter_analytics::*;
use tracing::debug;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default ./shelter.toml is used if present
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // a missing .env file is fine; SHELTER_* variables may come from the shell
    dotenvy::dotenv().ok();
    init_logging(cli.debug);

    let config = PipelineConfig::new(&cli.config).context("failed to load configuration")?;
    debug!("configuration:\n{}", config.summary());

    let summary = Pipeline::new(config)
        .run(&TracingSink)
        .context("shelter pipeline failed")?;
    debug!(
        "ran {} scripts and {} queries in {:?}",
        summary.scripts_run, summary.queries_run, summary.elapsed
    );

    Ok(())
}
