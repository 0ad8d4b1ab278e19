//! Notification sink.
//!
//! Delivery is best-effort: a sink never reports failure to its caller, so a
//! streak transition can not be held up or undone by a notification.

use std::sync::Mutex;

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Drops every notification. Used when notifications are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
}

/// Keeps every message in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Message sent after a day is finished.
pub fn celebration_message(count: u32) -> String {
    match count {
        1 => "Day finished! A new streak starts today.".to_string(),
        n if n % 7 == 0 => format!("Day finished! {n} days in a row, that's {} full weeks.", n / 7),
        n => format!("Day finished! Streak is now {n} days."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let sink = RecordingNotifier::new();
        sink.notify("one");
        sink.notify("two");
        assert_eq!(sink.messages(), vec!["one", "two"]);
    }

    #[test]
    fn celebration_mentions_weeks() {
        assert!(celebration_message(1).contains("new streak"));
        assert!(celebration_message(5).contains("5 days"));
        assert!(celebration_message(14).contains("2 full weeks"));
    }
}
