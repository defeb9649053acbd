//! Wikipath CLI - Wikipedia pathfinding from the command line.
//!
//! Finds link paths between articles, lazily caching the link graph in
//! `SQLite` as searches explore it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Wikipath: find paths through the Wikipedia link graph.
#[derive(Parser)]
#[command(name = "wikipath")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the link-graph database (created on first use)
    #[arg(short, long, global = true, default_value = "wikipath.db")]
    db: PathBuf,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a path between two article titles
    Find {
        /// Start article title
        start: String,

        /// Target article title
        end: String,

        /// Search strategy: bfs or ucs (uniform-cost / Dijkstra)
        #[arg(short, long, default_value = "bfs")]
        strategy: String,

        /// Give up after this many seconds of searching
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Eagerly cache links around a page, bounded by depth
    Preload {
        /// Article title to start from
        title: String,

        /// How many levels of links to expand
        #[arg(short = 'n', long, default_value = "2")]
        depth: u32,
    },

    /// Re-fetch a page's links if its revision changed
    Refresh {
        /// Article title to refresh
        title: String,
    },

    /// Show what is cached for a page
    Page {
        /// Article title to inspect
        title: String,
    },

    /// Show cache statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Run the appropriate command
    let result = match cli.command {
        Commands::Find {
            start,
            end,
            strategy,
            timeout,
        } => cli::find::run(&cli.db, &start, &end, &strategy, timeout),
        Commands::Preload { title, depth } => cli::preload::run(&cli.db, &title, depth),
        Commands::Refresh { title } => cli::refresh::run(&cli.db, &title),
        Commands::Page { title } => cli::page::run(&cli.db, &title),
        Commands::Stats => cli::stats::run(&cli.db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
