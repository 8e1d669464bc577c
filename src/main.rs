mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;

use muisti::{Config, MemoryStore};

use commands::Commands;
use output::{print_json, ErrorResponse};

/// muisti - A local semantic memory store for AI agents
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, muisti::Error> {
    let config = Config::load()?;
    config.ensure_directories()?;
    let store = MemoryStore::new(config)?;
    commands::execute(&cli.command, &store, cli.json)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}
