mod cli;

use std::io;
use std::process;

use anyhow::Context;
use clap::Parser;
use cli::commands::Cli;
use cli::progress::CliReporter;
use colored::*;
use console::Term;
use dedup::report::write_report;
use dedup::{ConfirmationGate, DedupEngine, RunOutcome};
use dotenv::dotenv;
use tracing::{debug, info};

/// Width used when stdout is not a terminal, wide enough to never abbreviate.
const FALLBACK_WIDTH: usize = 20 + 4096;

fn main() {
    dotenv().ok();

    let guard = cli::logging::init_logger();

    let args = Cli::parse();

    if let Err(err) = run(args) {
        debug!("{:#}", err);
        eprintln!("{}", format!("{:#}", err).red());
        drop(guard);
        process::exit(1);
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let config = dedup::config::load_configuration(args.config.as_deref())
        .context("Error loading configuration")?;
    let config = args.merge_into(config);

    let term_width = terminal_width();
    let reporter = CliReporter::new(config.verbose, term_width);
    let print_report = config.print_report;
    let mut gate = ConfirmationGate::stdio(!config.yes);
    let engine = DedupEngine::new(config);

    let outcome = engine.run(&mut gate, &reporter)?;
    drop(gate);

    match outcome {
        RunOutcome::Aborted => info!("Quit requested, stopping"),
        RunOutcome::Completed(stats) => {
            if print_report {
                let mut stdout = io::stdout().lock();
                write_report(&mut stdout, &stats, term_width)
                    .context("Error writing report")?;
            }
        }
    }
    Ok(())
}

fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| usize::from(cols))
        .unwrap_or(FALLBACK_WIDTH)
}
