//! Command-line interface.
//!
//! The environment is validated here, synchronously, before any command runs.
//! A bad environment ends the process with the full issue report and exit
//! status 1 without a logger or async runtime ever being created.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::models::AppConfig;
use crate::infrastructure::config::{EnvSchema, EnvSnapshot, ValidationErrors};

/// Command line of the `stock-service` binary.
#[derive(Debug, Parser)]
#[command(name = "stock-service")]
#[command(about = "Stock management API service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dotenv file read before the process environment (default: ./.env if present)
    #[arg(long, value_name = "PATH", global = true)]
    pub env_file: Option<PathBuf>,

    /// Settings file layered over config/settings.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Subcommands of `stock-service`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Validate the environment and start the HTTP service
    #[default]
    Serve,

    /// Validate the environment, print the redacted configuration and exit
    Check,
}

/// Run the parsed command line and map the outcome to a process exit code.
pub fn run(cli: Cli) -> ExitCode {
    let command = cli.command.unwrap_or_default();

    let result = load_config(cli.env_file.as_deref()).and_then(|config| match command {
        Commands::Check => commands::check::execute(&config, cli.json),
        Commands::Serve => commands::serve::execute(Arc::new(config), cli.settings.as_deref()),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            handle_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}

fn load_config(env_file: Option<&Path>) -> Result<AppConfig> {
    let snapshot = EnvSnapshot::from_process(env_file)?;
    Ok(EnvSchema::validate(&snapshot)?)
}

/// Print a failure to stderr, or as JSON on stdout in JSON mode.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) {
    let validation = err.downcast_ref::<ValidationErrors>();

    if json_mode {
        println!("{}", error_json(err, validation));
        return;
    }

    match validation {
        Some(errors) => eprint!("{}", errors.report()),
        None => eprintln!("Error: {err:#}"),
    }
}

fn error_json(err: &anyhow::Error, validation: Option<&ValidationErrors>) -> serde_json::Value {
    let issues: Vec<serde_json::Value> = validation
        .map(|errors| {
            errors
                .issues()
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "path": issue.path_string(),
                        "message": issue.message,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    serde_json::json!({
        "valid": false,
        "error": format!("{err:#}"),
        "issues": issues,
    })
}
