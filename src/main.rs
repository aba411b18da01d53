mod channel;
mod poller;
mod synthetic;
mod web;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;

use crate::poller::{ConsoleRenderer, FacadeSource, PointSource, Poller, SyntheticSource};
use crate::synthetic::DEFAULT_CENTER;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "trackline")]
#[command(about = "GPS channel proxy and live map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web facade and UI
    Serve {
        /// Optional YAML config file; environment variables override it
        #[arg(long)]
        config: Option<String>,
    },
    /// Poll a source and render updates to the terminal
    Poll {
        #[arg(long, value_enum, default_value_t = PollMode::Synthetic)]
        mode: PollMode,
        /// Facade base URL for live mode
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
        /// Refresh interval, e.g. "20s" (floor 2s)
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PollMode {
    Synthetic,
    Live,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Poll {
            mode,
            url,
            interval,
        } => poll(mode, &url, interval).await,
    }
}

async fn serve(config_path: Option<&str>) -> ExitCode {
    let config = match Config::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn poll(mode: PollMode, url: &str, interval: Option<Duration>) -> ExitCode {
    let source: Box<dyn PointSource> = match mode {
        PollMode::Synthetic => Box::new(SyntheticSource::default()),
        PollMode::Live => Box::new(FacadeSource::new(url)),
    };

    let mut poller = Poller::new(source, Box::new(ConsoleRenderer), DEFAULT_CENTER);
    poller
        .start(interval.unwrap_or(poller::DEFAULT_INTERVAL))
        .await;

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Signal error: {}", e);
        poller.stop().await;
        return ExitCode::FAILURE;
    }

    poller.stop().await;
    ExitCode::SUCCESS
}
