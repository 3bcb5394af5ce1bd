use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod workspace;

#[derive(Parser)]
#[command(name = "actearly", version, about = "ActEarly desk-break reminder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Break countdown control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Guided exercise sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Streak, daily counts and Ergo Score
    Stats,
    /// Per-part health report
    Body,
    /// Water intake
    Hydration {
        #[command(subcommand)]
        action: commands::hydration::HydrationAction,
    },
    /// Health tips for the session screen
    Tips,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the countdown in the foreground, printing events as they happen
    Watch {
        /// Stop after this many one-second ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("ACTEARLY_LOG").unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Session { action } => commands::session::run(action),
        Commands::Stats => commands::stats::run_stats(),
        Commands::Body => commands::stats::run_body(),
        Commands::Hydration { action } => commands::hydration::run(action),
        Commands::Tips => commands::tips::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch { ticks } => commands::watch::run(ticks),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
