use serde_json::json;
use streakbuddy_core::{Config, RenderTarget};

use super::describe;
use crate::render::TerminalRenderer;
use crate::session::open_tracker;
use crate::GlobalOpts;

pub fn run(opts: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(opts, &config)?;
    let events = tracker.drain_events();
    let streak = *tracker.streak();

    if opts.json {
        let value = json!({
            "today": tracker.today(),
            "count": streak.count,
            "last_completion": streak.last_completion,
            "streak_start": streak.start(),
            "finished_today": streak.last_completion == Some(tracker.today()),
            "events": events,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for event in &events {
        println!("{}", describe(event));
    }
    let stdout = std::io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), config.calendar.clone());
    renderer.update_streak_display(streak.count, streak.last_completion);
    Ok(())
}
