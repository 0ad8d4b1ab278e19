//! Per-command setup: store, configuration, today's date and notifier.

use std::sync::Arc;

use streakbuddy_core::{Config, Database, LocalDay, Notifier, SilentNotifier, Tracker};

use crate::GlobalOpts;

/// Prints notifications on stderr so they never mix with JSON output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("🔔 {message}");
        tracing::info!(target: "streakbuddy::notify", "{message}");
    }
}

pub fn resolve_today(opts: &GlobalOpts) -> Result<LocalDay, Box<dyn std::error::Error>> {
    match &opts.today {
        Some(raw) => Ok(LocalDay::parse(raw)?),
        None => Ok(LocalDay::today()),
    }
}

/// The notification sink allowed by the configuration.
pub fn notifier(config: &Config) -> Arc<dyn Notifier> {
    if config.notifications.enabled {
        Arc::new(ConsoleNotifier)
    } else {
        Arc::new(SilentNotifier)
    }
}

/// Open the database and load a tracker for today, health check included.
pub fn open_tracker(
    opts: &GlobalOpts,
    config: &Config,
) -> Result<Tracker<Database>, Box<dyn std::error::Error>> {
    let today = resolve_today(opts)?;
    let db = Database::open()?;
    let tracker = Tracker::open(db, today)?.with_celebration(config.notifications.celebrate);
    Ok(tracker)
}
