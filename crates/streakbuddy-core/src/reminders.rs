//! Per-task reminder timers.
//!
//! Each task with a reminder time gets one tokio timer for today, keyed by
//! task id. Removing the task cancels its timer; a timer fires at most once.
//! An optional still-exists check runs right before a timer fires, so a task
//! removed by another process since the last sync stays silent.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::events::Event;
use crate::notify::Notifier;
use crate::task::{Task, TaskList};

struct Pending {
    generation: u64,
    fire_at: NaiveDateTime,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Timers {
    pending: HashMap<String, Pending>,
    fired: HashSet<String>,
    next_generation: u64,
}

/// Answers whether a task id still exists at fire time.
pub type TaskExists = Arc<dyn Fn(&str) -> bool + Send + Sync>;

pub struct ReminderScheduler {
    runtime: Handle,
    notifier: Arc<dyn Notifier>,
    events: Option<UnboundedSender<Event>>,
    exists: Option<TaskExists>,
    timers: Arc<Mutex<Timers>>,
}

fn lock(timers: &Mutex<Timers>) -> MutexGuard<'_, Timers> {
    timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReminderScheduler {
    pub fn new(runtime: Handle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            runtime,
            notifier,
            events: None,
            exists: None,
            timers: Arc::new(Mutex::new(Timers::default())),
        }
    }

    /// Also publish scheduling events on `events`.
    pub fn with_events(mut self, events: UnboundedSender<Event>) -> Self {
        self.events = Some(events);
        self
    }

    /// Re-check that the task still exists right before each timer fires.
    pub fn with_task_check(mut self, exists: TaskExists) -> Self {
        self.exists = Some(exists);
        self
    }

    fn emit(&self, event: Event) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Schedule today's reminder for `task`, returning the delay.
    ///
    /// Returns `None` when the task has no reminder, its time has already
    /// passed today, or it already fired. Rescheduling an unchanged task
    /// keeps the existing timer.
    pub fn schedule(&self, task: &Task, now: NaiveDateTime) -> Option<Duration> {
        let Some(remind_at) = task.remind_at else {
            self.cancel(&task.id);
            return None;
        };
        let fire_at = now.date().and_time(remind_at);

        let mut timers = lock(&self.timers);
        if timers.fired.contains(&task.id) {
            return None;
        }
        if let Some(existing) = timers.pending.get(&task.id) {
            if existing.fire_at == fire_at {
                return (fire_at - now).to_std().ok();
            }
        }
        if let Some(stale) = timers.pending.remove(&task.id) {
            stale.handle.abort();
        }

        let delay = match (fire_at - now).to_std() {
            Ok(d) if !d.is_zero() => d,
            _ => {
                debug!(task = %task.id, at = %fire_at, "reminder time already passed today");
                return None;
            }
        };

        timers.next_generation += 1;
        let generation = timers.next_generation;

        let task_id = task.id.clone();
        let title = task.title.clone();
        let shared = Arc::clone(&self.timers);
        let notifier = Arc::clone(&self.notifier);
        let events = self.events.clone();
        let exists = self.exists.clone();

        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let alive = exists.as_ref().map_or(true, |check| check(&task_id));
            {
                let mut timers = lock(&shared);
                match timers.pending.get(&task_id) {
                    Some(p) if p.generation == generation => {
                        timers.pending.remove(&task_id);
                        if alive {
                            timers.fired.insert(task_id.clone());
                        }
                    }
                    _ => return,
                }
            }
            if !alive {
                info!(task = %task_id, "task removed before its reminder, skipping");
                if let Some(tx) = events {
                    let _ = tx.send(Event::ReminderCancelled { task_id });
                }
                return;
            }
            info!(task = %task_id, "reminder fired");
            notifier.notify(&format!("Reminder: {title}"));
            if let Some(tx) = events {
                let _ = tx.send(Event::ReminderFired {
                    task_id,
                    title,
                    at: fire_at,
                });
            }
        });

        timers.pending.insert(
            task.id.clone(),
            Pending {
                generation,
                fire_at,
                handle,
            },
        );
        drop(timers);

        debug!(task = %task.id, delay_secs = delay.as_secs(), "reminder scheduled");
        self.emit(Event::ReminderScheduled {
            task_id: task.id.clone(),
            title: task.title.clone(),
            fire_at,
        });
        Some(delay)
    }

    /// Cancel the pending reminder for `task_id`. Returns whether one existed.
    pub fn cancel(&self, task_id: &str) -> bool {
        let removed = lock(&self.timers).pending.remove(task_id);
        match removed {
            Some(p) => {
                p.handle.abort();
                info!(task = %task_id, "reminder cancelled");
                self.emit(Event::ReminderCancelled {
                    task_id: task_id.to_string(),
                });
                true
            }
            None => false,
        }
    }

    /// Bring the timers in line with `tasks`: cancel reminders of removed
    /// tasks and schedule the rest.
    pub fn sync(&self, tasks: &TaskList, now: NaiveDateTime) {
        let live: HashSet<&str> = tasks.tasks().iter().map(|t| t.id.as_str()).collect();
        let orphaned: Vec<String> = lock(&self.timers)
            .pending
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in orphaned {
            self.cancel(&id);
        }
        for task in tasks.tasks() {
            self.schedule(task, now);
        }
    }

    /// Pending reminders as `(task id, fire time)`, earliest first.
    pub fn pending(&self) -> Vec<(String, NaiveDateTime)> {
        let mut out: Vec<_> = lock(&self.timers)
            .pending
            .iter()
            .map(|(id, p)| (id.clone(), p.fire_at))
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.timers).pending.len()
    }

    pub fn has_fired(&self, task_id: &str) -> bool {
        lock(&self.timers).fired.contains(task_id)
    }

    /// Abort every pending timer.
    pub fn cancel_all(&self) {
        let drained: Vec<_> = lock(&self.timers).pending.drain().collect();
        for (_, p) in drained {
            p.handle.abort();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
