use serde_json::json;
use streakbuddy_core::{Config, FinishOutcome};

use super::describe;
use crate::render::{JsonRenderer, TerminalRenderer};
use crate::session::{notifier, open_tracker};
use crate::GlobalOpts;

pub fn run(opts: &GlobalOpts) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(opts, &config)?;
    let notifier = notifier(&config);

    if opts.json {
        let mut renderer = JsonRenderer::default();
        let outcome = tracker.finish_day(&mut renderer, notifier.as_ref())?;
        let events = tracker.drain_events();
        let mut frame = renderer.into_value();
        frame["outcome"] = serde_json::to_value(outcome)?;
        frame["events"] = json!(events);
        println!("{}", serde_json::to_string_pretty(&frame)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), config.calendar.clone());
    let outcome = tracker.finish_day(&mut renderer, notifier.as_ref())?;
    for event in tracker.drain_events() {
        println!("{}", describe(&event));
    }
    if let FinishOutcome::AlreadyFinished { count } = outcome {
        println!("Streak: {count}");
    }
    Ok(())
}
