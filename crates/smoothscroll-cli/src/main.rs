use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smoothscroll_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "smoothscroll")]
#[command(author, version, about = "Time-based smooth scrolling with pixel-exact totals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal host
    Run,
    /// Replay wheel events on a simulated page and print every frame
    Simulate(commands::simulate::SimulateArgs),
    /// Show or create the configuration file
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging. The terminal host owns stdout, so logs go to
    // stderr and stay quiet there unless RUST_LOG asks for them.
    let default_filter = match cli.command {
        Some(Commands::Run) | None => "off".to_string(),
        _ => config.general.log_level.clone(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default_filter),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config),
        Some(Commands::Simulate(args)) => commands::simulate::run(&config, args),
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}
