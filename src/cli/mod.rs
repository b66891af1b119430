//! Command-line interface for autoslider
//!
//! Provides `run`, `plan` and `presets` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod plan;
mod presets;
mod run;
mod utils;

/// Drive a character editor's sliders from a target profile
#[derive(Parser)]
#[command(name = "autoslider")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the key sequence that turns the default profile into the target
    Run(run::RunArgs),

    /// Compute the key sequence without sending any input
    Plan(plan::PlanArgs),

    /// List template profiles in a directory as Markdown
    Presets(presets::PresetsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Plan(args) => plan::run(args),
        Commands::Presets(args) => presets::run(args),
    }
}
