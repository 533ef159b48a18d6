use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "breakbank-cli", version, about = "breakbank CLI")]
struct Cli {
    /// Pin the clock to this epoch-ms instant instead of reading the system time
    #[arg(long, global = true)]
    now: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Logged work events
    Events {
        #[command(subcommand)]
        action: commands::events::EventsAction,
    },
    /// Per-task time totals
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BREAKBANK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = cli.now;
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, now),
        Commands::Task { action } => commands::task::run(action, now),
        Commands::Events { action } => commands::events::run(action, now),
        Commands::Stats { action } => commands::stats::run(action, now),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
