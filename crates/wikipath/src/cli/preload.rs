//! `wikipath preload` command implementation.

use std::path::Path;

use colored::Colorize;
use wikipath::Pathfinder;

/// Run the preload command.
pub fn run(db: &Path, title: &str, depth: u32) -> Result<(), wikipath::Error> {
    println!(
        "{} {title} (depth {depth})...",
        "Preloading".cyan().bold()
    );

    let pathfinder = Pathfinder::new(db)?;
    let stats = pathfinder.preload(title, depth)?;

    println!();
    println!(
        "{} {} pages, recorded {} links",
        "Expanded".green().bold(),
        stats.pages_expanded,
        stats.links_recorded
    );
    if stats.pages_skipped > 0 {
        println!(
            "{}: {} pages (already cached or out of depth)",
            "Skipped".yellow(),
            stats.pages_skipped
        );
    }
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    Ok(())
}
