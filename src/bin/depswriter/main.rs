//! depswriter CLI - deps file generator for Closure-style JavaScript

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use depswriter::util::diagnostic::FatalDepsError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        match e.downcast::<FatalDepsError>() {
            Ok(fatal) => eprintln!("{:?}", miette::Report::new(fatal)),
            Err(e) => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("depswriter=debug")
    } else {
        EnvFilter::new("depswriter=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, cli.verbose, color),
        Commands::Check(args) => commands::check::execute(args, cli.verbose, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
