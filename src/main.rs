use anyhow::Context;
use clap::Parser;
use revtrack::cli::Cli;
use revtrack::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    let default_level = config
        .as_ref()
        .map(|c| c.log_level.as_str())
        .unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config.context("failed to load config")?;
    cli.run(&config)
}
