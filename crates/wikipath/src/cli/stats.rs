//! `wikipath stats` command implementation.

use std::path::Path;

use colored::Colorize;
use wikipath::Pathfinder;

/// Run the stats command.
pub fn run(db: &Path) -> Result<(), wikipath::Error> {
    let pathfinder = Pathfinder::new(db)?;

    // Get database size
    let db_path = pathfinder.db_path();
    let db_size_str = match std::fs::metadata(db_path) {
        Ok(meta) => format_size(meta.len()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to get database file size");
            "size unknown".to_string()
        }
    };

    let stats = pathfinder.stats()?;

    println!("{}", "Wikipath Cache Statistics".cyan().bold());
    println!();
    println!(
        "  {}: {} ({})",
        "Database".white().bold(),
        db_path.display(),
        db_size_str
    );
    println!();
    println!(
        "  {}: {}",
        "Pages".white().bold(),
        stats.page_count.to_string().green()
    );
    println!(
        "    {}: {}",
        "expanded".dimmed(),
        stats.expanded_count
    );
    println!(
        "  {}: {}",
        "Links".white().bold(),
        stats.link_count.to_string().green()
    );

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
