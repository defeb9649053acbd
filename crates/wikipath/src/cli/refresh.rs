//! `wikipath refresh` command implementation.

use std::path::Path;

use colored::Colorize;
use wikipath::{Pathfinder, RefreshOutcome};

/// Run the refresh command.
pub fn run(db: &Path, title: &str) -> Result<(), wikipath::Error> {
    let pathfinder = Pathfinder::new(db)?;

    match pathfinder.refresh_links(title)? {
        RefreshOutcome::Fresh => {
            println!("{} {title} is up to date", "Fresh".green().bold());
        }
        RefreshOutcome::Refreshed { links } => {
            println!(
                "{} {title}: {links} links recorded",
                "Refreshed".green().bold()
            );
        }
    }

    Ok(())
}
