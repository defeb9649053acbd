//! `wikipath find` command implementation.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use wikipath::{Error, Pathfinder, SearchOptions, Strategy, Termination};

/// Run the find command.
pub fn run(
    db: &Path,
    start: &str,
    end: &str,
    strategy: &str,
    timeout: Option<u64>,
) -> Result<(), Error> {
    let strategy = parse_strategy(strategy)?;

    println!(
        "{} {} {} {} ({})...",
        "Searching".cyan().bold(),
        start,
        "->".dimmed(),
        end,
        strategy.as_str()
    );

    let pathfinder = Pathfinder::new(db)?;
    let options = SearchOptions {
        deadline: timeout.map(Duration::from_secs),
    };

    let outcome = pathfinder.find_path_with(start, end, strategy, &options)?;

    println!();
    match &outcome.path {
        Some(path) => {
            println!(
                "{} {} hops, {} pages explored",
                "Found".green().bold(),
                path.len().saturating_sub(1),
                outcome.visited.len()
            );
            for (i, title) in path.iter().enumerate() {
                println!("  {} {title}", format!("{i:>3}.").dimmed());
            }
        }
        None => {
            let reason = match outcome.termination {
                Termination::DeadlineExceeded => "search timed out",
                _ => "no path found",
            };
            println!(
                "{} {reason} ({} pages explored)",
                "Exhausted".yellow().bold(),
                outcome.visited.len()
            );
        }
    }

    Ok(())
}

/// Parse the user-facing strategy name.
fn parse_strategy(name: &str) -> Result<Strategy, Error> {
    match name.to_lowercase().as_str() {
        "bfs" => Ok(Strategy::Bfs),
        "ucs" | "dijkstra" | "uniform-cost" => Ok(Strategy::UniformCost),
        other => Err(Error::Config(format!(
            "unknown strategy: {other} (expected bfs or ucs)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strategy_accepts_aliases() {
        assert_eq!(parse_strategy("bfs").unwrap(), Strategy::Bfs);
        assert_eq!(parse_strategy("BFS").unwrap(), Strategy::Bfs);
        assert_eq!(parse_strategy("ucs").unwrap(), Strategy::UniformCost);
        assert_eq!(parse_strategy("dijkstra").unwrap(), Strategy::UniformCost);
        assert!(parse_strategy("dfs").is_err());
    }
}
