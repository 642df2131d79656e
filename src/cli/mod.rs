use std::io::{IsTerminal, Write};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use crate::config::{Config, ThemeChoice};
use crate::render::{TerminalReport, Theme};
use crate::report::{initialize, JsonReport, ReportOptions, Summary};
use crate::services::dates;
use crate::services::providers;
use crate::services::{InputSource, ReviewStore, SnapshotLoader};
use crate::types::ReviewRecord;

/// Review analysis report: review totals and rating trends per publisher and premise
#[derive(Parser)]
#[command(name = "revtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full report (counters, totals, rating trends)
    Report {
        /// Snapshot JSON file (stdin when omitted or "-")
        input: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Day label pattern, e.g. "MM-dd-yyyy" or "MMM d"
        #[arg(long)]
        date_pattern: Option<String>,

        /// Color theme
        #[arg(long, value_enum)]
        theme: Option<ThemeChoice>,
    },

    /// Show counters and totals only
    Summary {
        /// Snapshot JSON file (stdin when omitted or "-")
        input: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known review providers
    Providers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self.command {
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
            Some(Commands::Report {
                input,
                json,
                date_pattern,
                theme,
            }) => {
                let options = ReportOptions {
                    date_pattern: date_pattern.unwrap_or_else(|| config.date_pattern.clone()),
                };
                if dates::to_strftime(&options.date_pattern).is_none() {
                    tracing::warn!(
                        pattern = %options.date_pattern,
                        "unsupported date pattern, axis labels fall back to raw dates"
                    );
                }
                run_report(
                    input.as_deref(),
                    json,
                    &options,
                    theme.unwrap_or(config.theme),
                )
            }
            Some(Commands::Summary { input, json }) => run_summary(input.as_deref(), json),
            Some(Commands::Providers { json }) => run_providers(json),
        }
    }
}

fn load_records(input: Option<&str>) -> anyhow::Result<Vec<ReviewRecord>> {
    let source = InputSource::from_arg(input);
    SnapshotLoader::load(&source)
        .with_context(|| format!("failed to load snapshot from {}", describe(&source)))
}

fn describe(source: &InputSource) -> String {
    match source {
        InputSource::Stdin => "stdin".to_string(),
        InputSource::Path(path) => path.display().to_string(),
    }
}

fn run_report(
    input: Option<&str>,
    json: bool,
    options: &ReportOptions,
    theme: ThemeChoice,
) -> anyhow::Result<()> {
    let records = load_records(input)?;
    let mut store = ReviewStore::new();

    if json {
        let mut report = JsonReport::new();
        initialize(&mut store, records, &mut report, options);
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    let theme = if styled {
        Theme::resolve(theme)
    } else {
        Theme::Dark
    };

    let mut report = TerminalReport::new(theme, TerminalReport::terminal_width());
    initialize(&mut store, records, &mut report, options);

    let mut out = stdout.lock();
    if styled {
        report.write_styled(&mut out)?;
    } else {
        out.write_all(report.render_plain().as_bytes())?;
    }
    Ok(())
}

fn run_summary(input: Option<&str>, json: bool) -> anyhow::Result<()> {
    let mut store = ReviewStore::new();
    store.load(load_records(input)?);
    let summary = Summary::from_store(&store);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Locations:  {}", summary.locations);
    println!("Publishers: {}", summary.publishers);
    println!("Reviews:    {}", summary.reviews);
    println!();
    println!("{:<16}{:>10}", "Publisher", "Reviews");
    for total in &summary.publisher_totals {
        println!("{:<16}{:>10}", total.publisher, total.count);
    }
    println!();
    println!("{:<16}{:>10}", "On Premise", summary.premise_totals.on);
    println!("{:<16}{:>10}", "Off Premise", summary.premise_totals.off);
    Ok(())
}

fn run_providers(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(providers::all())?);
        return Ok(());
    }

    println!("{:<14}{:<10}{}", "Provider", "Color", "Premises");
    for meta in providers::all() {
        println!(
            "{:<14}{:<10}{}",
            meta.label,
            meta.color,
            if meta.on_premises { "on" } else { "off" }
        );
    }
    Ok(())
}
