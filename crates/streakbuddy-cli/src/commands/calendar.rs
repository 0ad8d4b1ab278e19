use clap::Args;
use serde_json::json;
use streakbuddy_core::{Config, YearMonth};

use crate::render::{JsonRenderer, TerminalRenderer};
use crate::session::open_tracker;
use crate::GlobalOpts;

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM); defaults to the current month
    #[arg(long)]
    month: Option<String>,
    /// Months to move from the starting month, e.g. -1 for the previous one
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,
}

pub fn run(opts: &GlobalOpts, args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut tracker = open_tracker(opts, &config)?;
    let start = match args.month {
        Some(raw) => YearMonth::parse(&raw)?,
        None => tracker.viewed_month(),
    };
    let month = start.shift(args.offset);

    if opts.json {
        let mut renderer = JsonRenderer::default();
        tracker.refresh(&mut renderer);
        tracker.show_month(month, &mut renderer);
        let mut value = renderer.into_value();
        value["events"] = json!(tracker.drain_events());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), config.calendar.clone());
    tracker.show_month(month, &mut renderer);
    Ok(())
}
