//! `wikipath page` command implementation.

use std::path::Path;

use colored::Colorize;
use wikipath::Pathfinder;

/// Run the page command.
pub fn run(db: &Path, title: &str) -> Result<(), wikipath::Error> {
    let pathfinder = Pathfinder::new(db)?;

    let Some(record) = pathfinder.page(title)? else {
        println!("{} {title} is not in the cache", "Unknown".yellow().bold());
        return Ok(());
    };

    println!("{}", record.title.cyan().bold());
    println!("  {}: {}", "id".dimmed(), record.id.as_i64());
    println!(
        "  {}: {}",
        "expanded".dimmed(),
        if record.expanded {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!(
        "  {}: {}",
        "revision".dimmed(),
        record.last_revision.as_deref().unwrap_or("none")
    );

    Ok(())
}
