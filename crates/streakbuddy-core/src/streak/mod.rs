mod engine;
mod record;

pub use engine::{check_health, finish_day, FinishOutcome, HealthReport, StreakState};
pub use record::CompletionRecord;
