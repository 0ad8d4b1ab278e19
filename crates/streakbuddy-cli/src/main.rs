use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod render;
mod session;

#[derive(Parser)]
#[command(name = "streakbuddy", version, about = "Streak Buddy daily-habit tracker")]
pub struct Cli {
    /// Treat this day (YYYY-MM-DD) as today instead of the local date
    #[arg(long, global = true)]
    today: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark today finished
    Finish,
    /// Show the current streak
    Status,
    /// Show a month of the completion heat-map
    Calendar(commands::calendar::CalendarArgs),
    /// Completion statistics
    Stats(commands::stats::StatsArgs),
    /// Task list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Task reminders
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Import a browser localStorage dump
    Import(commands::transfer::ImportArgs),
    /// Export the stored state as JSON
    Export,
}

/// Options shared by every command.
pub struct GlobalOpts {
    pub today: Option<String>,
    pub json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let opts = GlobalOpts {
        today: cli.today,
        json: cli.json,
    };
    let result = match cli.command {
        Commands::Finish => commands::finish::run(&opts),
        Commands::Status => commands::status::run(&opts),
        Commands::Calendar(args) => commands::calendar::run(&opts, args),
        Commands::Stats(args) => commands::stats::run(&opts, args),
        Commands::Task { action } => commands::task::run(&opts, action),
        Commands::Remind { action } => commands::remind::run(&opts, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Import(args) => commands::transfer::import(&opts, args),
        Commands::Export => commands::transfer::export(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
