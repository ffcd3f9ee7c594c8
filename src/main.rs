//! Unified tally CLI.
//!
//! - `tally run` - Run the accounting service (alias `serve`)
//! - `tally check` - Validate a configuration file and exit

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// tally unified CLI.
#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Traffic accounting side-car for proxy servers",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the accounting service.
    #[command(name = "run", alias = "serve")]
    Run(Box<tally_server::ServerArgs>),

    /// Validate a configuration file.
    #[command(name = "check")]
    Check {
        /// Config file path (json/yaml/toml)
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => tally_server::cli::run(*args).await,
        Commands::Check { config } => tally_config::load_config(&config)
            .and_then(|c| tally_config::validate_config(&c))
            .map(|()| println!("{}: ok", config.display()))
            .map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
