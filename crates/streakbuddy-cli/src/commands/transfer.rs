use std::path::PathBuf;

use clap::Args;
use streakbuddy_core::storage::{export_snapshot, import_snapshot};
use streakbuddy_core::Database;

use crate::GlobalOpts;

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file holding the browser's localStorage entries
    file: PathBuf,
}

pub fn import(opts: &GlobalOpts, args: ImportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.file)?;
    let mut db = Database::open()?;
    let summary = import_snapshot(&mut db, &raw)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Imported {} new finished days.", summary.new_days);
    println!("Streak: {}", summary.streak.count);
    if let Some(n) = summary.tasks {
        println!("Tasks: {n}");
    }
    if summary.skipped > 0 {
        println!("Skipped {} unreadable entries.", summary.skipped);
    }
    Ok(())
}

pub fn export() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let value = export_snapshot(&db)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
