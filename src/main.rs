use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::error;

mod calendar;
mod config;
mod console;
mod datetime;
mod error;
mod logging;
mod report_command;
mod summary;
mod tempo;
mod worklog;

use config::{Config, Settings};
use console::{ConsolePresenter, ConsoleReport};
use report_command::{ReportArgs, ReportCommand};
use tempo::TempoClient;

/// Tempoのworklogを集計し、日毎、今週、今月の労働時間を表示するCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run
/// $ cargo run -- --date 2024-01-31 --config ./config.json
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        short = 'c',
        long = "config",
        help = "Path to the config file with the Tempo projects"
    )]
    config: Option<PathBuf>,

    #[clap(long = "debug", help = "Show debug logs")]
    debug: bool,

    #[clap(long = "no-color", help = "Disable colored output")]
    no_color: bool,

    #[clap(flatten)]
    report: ReportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_env();

    logging::init(args.debug || settings.debug)?;

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)?;

    let client = TempoClient::new(&settings).context("Failed to create tempo client")?;
    let command = ReportCommand::new(&client);
    let outcome = command.run(&config.projects, args.report).await;

    let color = !args.no_color && io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();
    let mut presenter = ConsoleReport::new(&mut stdout, color);
    presenter
        .show_summary(&outcome.summary)
        .context("Failed to show summary")?;

    if !outcome.failures.is_empty() {
        for failure in &outcome.failures {
            error!("Failed to get hours for {}: {}", failure.account, failure.error);
        }
        bail!(
            "Failed to get hours for {} of {} accounts",
            outcome.failures.len(),
            config.projects.len()
        );
    }

    Ok(())
}
