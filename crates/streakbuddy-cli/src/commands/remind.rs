//! Reminder commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Subcommand;
use streakbuddy_core::{Config, Database, Event, ReminderScheduler};
use tokio::sync::mpsc;
use tracing::warn;

use super::describe;
use crate::session::{notifier, resolve_today};
use crate::GlobalOpts;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Show today's remaining reminders
    List,
    /// Stay running and deliver today's reminders as they come due
    Watch {
        /// Seconds between task list re-reads (defaults to reminders.poll_secs)
        #[arg(long)]
        poll_secs: Option<u64>,
    },
}

pub fn run(opts: &GlobalOpts, action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    if !config.reminders.enabled {
        println!("Reminders are disabled (reminders.enabled = false).");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    match action {
        RemindAction::List => runtime.block_on(list(opts, &config)),
        RemindAction::Watch { poll_secs } => {
            let poll = Duration::from_secs(poll_secs.unwrap_or(config.reminders.poll_secs).max(1));
            runtime.block_on(watch(opts, &config, poll))
        }
    }
}

fn now_for(opts: &GlobalOpts) -> Result<chrono::NaiveDateTime, Box<dyn std::error::Error>> {
    let today = resolve_today(opts)?;
    Ok(today.date().and_time(Local::now().time()))
}

async fn list(opts: &GlobalOpts, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = streakbuddy_core::storage::load_tasks(&Database::open()?)?;
    let scheduler = ReminderScheduler::new(tokio::runtime::Handle::current(), notifier(config));
    scheduler.sync(&tasks, now_for(opts)?);

    let pending: Vec<_> = scheduler
        .pending()
        .into_iter()
        .filter_map(|(id, at)| tasks.get(&id).map(|t| (t.title.clone(), at)))
        .collect();
    if opts.json {
        let value: Vec<_> = pending
            .iter()
            .map(|(title, at)| serde_json::json!({ "title": title, "fire_at": at }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if pending.is_empty() {
        println!("No reminders left for today.");
    } else {
        for (title, at) in pending {
            println!("{}  {}", at.format("%H:%M"), title);
        }
    }
    Ok(())
}

fn print_event(opts: &GlobalOpts, event: &Event) -> Result<(), serde_json::Error> {
    if opts.json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("{}", describe(event));
    }
    Ok(())
}

/// Fire-time lookup, so a `task remove` between polls keeps its reminder
/// silent. An unreadable store lets the reminder through.
fn task_still_listed(task_id: &str) -> bool {
    match Database::open().and_then(|db| streakbuddy_core::storage::load_tasks(&db)) {
        Ok(tasks) => tasks.tasks().iter().any(|t| t.id == task_id),
        Err(e) => {
            warn!("could not re-read tasks before reminder: {e}");
            true
        }
    }
}

async fn watch(
    opts: &GlobalOpts,
    config: &Config,
    poll: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = ReminderScheduler::new(tokio::runtime::Handle::current(), notifier(config))
        .with_events(tx)
        .with_task_check(Arc::new(task_still_listed));
    let start_day = resolve_today(opts)?;

    let mut ticker = tokio::time::interval(poll);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if resolve_today(opts)? != start_day {
                    break;
                }
                match Database::open().and_then(|db| streakbuddy_core::storage::load_tasks(&db)) {
                    Ok(tasks) => scheduler.sync(&tasks, now_for(opts)?),
                    Err(e) => warn!("could not reload tasks: {e}"),
                }
                if scheduler.pending_count() == 0 {
                    break;
                }
            }
            Some(event) = rx.recv() => print_event(opts, &event)?,
        }
    }

    while let Ok(event) = rx.try_recv() {
        print_event(opts, &event)?;
    }
    if !opts.json {
        println!("No reminders left for today.");
    }
    Ok(())
}
