// EN: src/bin/systest.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use systest::{
    cli::{self, Cli, dispatcher},
    context::AppContext,
};

/// The main entry point of the `systest` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handler-level `--help` and usage errors render like top-level ones.
        if let Some(clap_error) = e.downcast_ref::<clap::Error>() {
            clap_error.exit();
        }
        eprintln!("\n{}: {}", "Error".red().bold(), cli::error_message(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let context = AppContext::from_env()?;
    dispatcher::dispatch(cli.args, &context)
}
