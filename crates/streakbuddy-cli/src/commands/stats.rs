use clap::Args;
use streakbuddy_core::{Config, YearMonth};

use crate::session::open_tracker;
use crate::GlobalOpts;

#[derive(Args)]
pub struct StatsArgs {
    /// Include a breakdown for this month (YYYY-MM)
    #[arg(long)]
    month: Option<String>,
}

pub fn run(opts: &GlobalOpts, args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_tracker(opts, &config)?;
    let month = args.month.as_deref().map(YearMonth::parse).transpose()?;
    let stats = tracker.stats(month);

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let fmt_day = |d: Option<streakbuddy_core::LocalDay>| {
        d.map(|d| d.to_string()).unwrap_or_else(|| "None".into())
    };
    println!("Current streak:   {}", stats.current_streak);
    println!("Longest streak:   {}", stats.longest_streak);
    println!("Days finished:    {}", stats.total_days);
    println!("First finished:   {}", fmt_day(stats.first_completion));
    println!("Last completion:  {}", fmt_day(stats.last_completion));
    if let Some(m) = &stats.month {
        println!(
            "{} {}: {}/{} finished, {} missed",
            m.month.name(),
            m.month.year(),
            m.completed,
            m.days_in_month,
            m.missed
        );
    }
    Ok(())
}
