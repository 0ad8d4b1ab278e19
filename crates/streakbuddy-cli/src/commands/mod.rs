pub mod calendar;
pub mod config;
pub mod finish;
pub mod remind;
pub mod stats;
pub mod status;
pub mod task;
pub mod transfer;

use streakbuddy_core::Event;

/// One-line description of an event for text output.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::StreakBroken {
            previous_count,
            last_completion,
            ..
        } => format!(
            "Streak of {previous_count} broken: last finished day was {last_completion}."
        ),
        Event::StreakRepaired { .. } => "Streak data was inconsistent and has been reset.".into(),
        Event::DayFinished { day, count, continued } => {
            if *continued {
                format!("Finished {day}. Streak continues: {count}.")
            } else {
                format!("Finished {day}. Streak started.")
            }
        }
        Event::AlreadyFinished { .. } => "Already marked complete today!".into(),
        Event::ReminderScheduled { title, fire_at, .. } => {
            format!("Reminder for '{title}' at {}", fire_at.format("%H:%M"))
        }
        Event::ReminderFired { title, .. } => format!("Reminder sent: {title}"),
        Event::ReminderCancelled { task_id } => format!("Reminder cancelled for task {task_id}"),
    }
}
