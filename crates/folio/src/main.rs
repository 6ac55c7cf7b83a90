//! Folio CLI - file-system content tree router.
//!
//! Provides commands for:
//! - `resolve`: Route a request path and print the matched page and variables
//! - `tree`: Print the logical content tree
//! - `reindex`: Drop cached folder indexes

mod commands;
mod error;
mod output;
mod site;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ReindexArgs, ResolveArgs, TreeArgs};
use output::Output;

/// Folio - file-system content tree router.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a request path against the content tree.
    Resolve(ResolveArgs),
    /// Print the content tree.
    Tree(TreeArgs),
    /// Drop cached folder indexes.
    Reindex(ReindexArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Resolve(args) => args.site.verbose,
            Self::Tree(args) => args.site.verbose,
            Self::Reindex(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
        Commands::Reindex(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
