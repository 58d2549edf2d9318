use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tapcoin", version, about = "Tapcoin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a snapshot of a freshly seeded session as JSON
    Status(commands::session::StatusArgs),
    /// Print the daily reset countdowns
    Countdown(commands::countdown::CountdownArgs),
    /// Run a deterministic session: taps first, then accrual ticks
    Simulate(commands::session::SimulateArgs),
    /// Play a live session; each stdin line "x y" is a tap, "q" quits
    Play(commands::play::PlayArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status(args) => commands::session::status(args),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Simulate(args) => commands::session::simulate(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
