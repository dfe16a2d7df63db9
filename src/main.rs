//! texmill - A build orchestrator for multi-document LaTeX projects.

mod build;
mod cli;
mod config;
mod document;
mod driver;
mod error;
mod init;
mod logger;
mod placeholder;
mod stage;
mod staleness;
mod utils;

use anyhow::Result;
use build::{BuildOutcome, BuildReport};
use clap::Parser;
use cli::{Cli, Commands};
use config::ProjectConfig;
use init::new_project;
use utils::exec::SystemRunner;

fn main() {
    let cli = Cli::parse();
    logger::set_verbose(cli.verbose);

    if let Err(err) = run(&cli) {
        log!("error"; "{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = ProjectConfig::load(cli)?;
    if !cli.is_init() {
        config.validate()?;
    }

    match &cli.command {
        Commands::Init => new_project(&config),
        Commands::Build { .. } => {
            match build::run(&config, &SystemRunner)? {
                BuildOutcome::Skipped(reason) => debug!("skip"; "{}", reason),
                BuildOutcome::Completed(report) => summarize(&report),
            }
            Ok(())
        }
    }
}

/// One closing line with what happened to each document
fn summarize(report: &BuildReport) {
    let BuildReport {
        built,
        up_to_date,
        placeholders,
    } = report;

    if !placeholders.is_empty() {
        log!("dummy"; "placeholder written for {}", placeholders.join(", "));
        return;
    }
    log!(
        "build";
        "{} built, {} up to date",
        built.len(),
        up_to_date.len()
    );
}
