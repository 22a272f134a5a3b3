use std::io;

use clap::Parser;
use procwatch_core::get_platform;
use procwatch_proc::ProcessTable;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

mod render;
mod session;

/// An interactive console for listing, monitoring, and terminating processes.
#[derive(Parser, Debug)]
#[command(name = "procwatch", version, about, long_about = None)]
struct Cli {
    /// The format for log output.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// The minimum log level to display.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: tracing::Level,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable text format.
    Text,
    /// Machine-readable JSON format.
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Initialize the tracing subscriber. Logs go to stderr; stdout belongs
    // to the interactive session.
    let filter = EnvFilter::from_default_env().add_directive(cli.log_level.into());

    match cli.log_format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }

    info!(platform = get_platform(), "Initialization complete. Starting main logic.");

    let mut table = ProcessTable::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = session::run(&mut input, &mut out, &mut table) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    info!("Main logic finished.");
}
