//! Mosaic Actions - headless driver for the editor's action registry
//!
//! Lists shortcuts and actions, validates option catalogs and dry-runs tile
//! insertions against a recording host.

mod cli;

use clap::{Parser, Subcommand};
use cli::{ActionsArgs, CheckArgs, ExitCode, InsertArgs, ShortcutsArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mosaic Actions - action registry and tile insertion toolkit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the shortcut table and report collisions
    Shortcuts(ShortcutsArgs),
    /// List registered actions and their visibility
    Actions(ActionsArgs),
    /// Validate an options file
    Check(CheckArgs),
    /// Dry-run a tile insertion
    Insert(InsertArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Shortcuts(args) => args.execute(),
        Commands::Actions(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Insert(args) => args.execute(),
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("Error: {}", err);
            err.code
        }
    };
    std::process::exit(code as i32);
}
