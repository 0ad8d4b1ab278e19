//! Task management commands for CLI.

use clap::Subcommand;
use streakbuddy_core::task::parse_reminder_time;
use streakbuddy_core::Config;

use crate::session::open_tracker;
use crate::GlobalOpts;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Daily reminder time (HH:MM, 24-hour)
        #[arg(long)]
        remind: Option<String>,
    },
    /// Remove a task by id or list position
    Remove {
        /// Task id, id prefix, or 1-based position
        task: String,
    },
    /// List tasks
    List,
}

pub fn run(opts: &GlobalOpts, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(opts, &config)?;

    match action {
        TaskAction::Add { title, remind } => {
            let remind_at = remind.as_deref().map(parse_reminder_time).transpose()?;
            let task = tracker.add_task(&title, remind_at)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task added: {}", task.id);
            }
        }
        TaskAction::Remove { task } => {
            // A running `remind watch` checks the stored list before firing.
            let removed = tracker.remove_task(&task)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&removed)?);
            } else {
                println!("Task removed: {}", removed.title);
            }
        }
        TaskAction::List => {
            let tasks = tracker.tasks()?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for (i, task) in tasks.tasks().iter().enumerate() {
                    let reminder = task
                        .remind_at
                        .map(|t| format!("  (reminder {})", t.format("%H:%M")))
                        .unwrap_or_default();
                    let short_id = task.id.get(..8).unwrap_or(&task.id);
                    println!("{:>2}. {}{}  [{}]", i + 1, task.title, reminder, short_id);
                }
            }
        }
    }
    Ok(())
}
