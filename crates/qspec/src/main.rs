//! qspec CLI - Question-spec compiler.
//!
//! Provides commands for:
//! - `build`: Compile a content tree into renderer-ready JSON
//! - `check`: Validate question specs without writing output

mod commands;
mod error;
mod output;
mod pipeline;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs};
use output::Output;

/// qspec - Question-spec compiler.
#[derive(Parser)]
#[command(name = "qspec", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile question specs and plain markdown into JSON trees.
    Build(BuildArgs),
    /// Validate question specs without writing output.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Check(args) => args.verbose,
    };

    // --verbose pins the filter to debug, otherwise RUST_LOG decides
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
