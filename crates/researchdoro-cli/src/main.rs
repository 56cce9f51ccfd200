use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

const LOG_ENV: &str = "RESEARCHDORO_LOG";

#[derive(Parser)]
#[command(name = "researchdoro", version, about = "Pomodoro timer with an AI research assistant")]
struct Cli {
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
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Research context shared with the assistant
    Context {
        #[command(subcommand)]
        action: commands::context::ContextAction,
    },
    /// AI research assistant
    Ai {
        #[command(subcommand)]
        action: commands::ai::AiAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Context { action } => commands::context::run(action),
        Commands::Ai { action } => commands::ai::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
