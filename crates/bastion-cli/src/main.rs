//! Bastion CLI - offline tooling for the backend protocol layer.
//!
//! Replays a saved management backend response through the same validation
//! the agent applies, and prints what would have been accepted.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;

/// Bastion - backend response inspection
#[derive(Parser)]
#[command(name = "bastion")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "BASTION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a saved backend response and show what it would deliver
    Inspect {
        /// File holding the response body
        #[arg(short, long)]
        body: PathBuf,

        /// HTTP status code the response arrived with
        #[arg(short, long, default_value_t = 200)]
        status: i64,

        /// File holding the raw response headers
        #[arg(long)]
        headers: Option<PathBuf>,

        /// Override the hook whitelist pointer from the configuration
        #[arg(long)]
        whitelist_path: Option<String>,

        /// Erase the value at this pointer before printing the body (repeatable)
        #[arg(long = "redact", value_name = "POINTER")]
        redact: Vec<String>,
    },

    /// Print the digest the backend should publish for a plugin file
    Digest {
        /// Plugin source file
        file: PathBuf,

        /// Digest algorithm (md5, sha256, blake3); defaults to the configured one
        #[arg(short, long)]
        algorithm: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => bastion_config::Config::load_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => bastion_config::Config::default_embedded()
            .context("embedded default configuration is invalid")?,
    };

    // Set up logging from config, with --verbose override.
    let mut log_config = config_bridge::to_log_config(&config);
    if cli.verbose {
        log_config.level = "debug".to_string();
    }
    if let Err(e) = bastion_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Inspect {
            body,
            status,
            headers,
            whitelist_path,
            redact,
        } => {
            let args = commands::inspect::InspectArgs {
                body,
                status,
                headers,
                whitelist_path,
                redact,
            };
            commands::inspect::run(&config, &args)
        },
        Commands::Digest { file, algorithm } => {
            commands::digest::run(&config, &file, algorithm.as_deref())?;
            Ok(ExitCode::SUCCESS)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_takes_body_as_flag() {
        let cli = Cli::try_parse_from([
            "bastion", "inspect", "--body", "resp.json", "--status", "503", "--redact", "/data",
        ])
        .unwrap();
        match cli.command {
            Commands::Inspect {
                body,
                status,
                redact,
                ..
            } => {
                assert_eq!(body, PathBuf::from("resp.json"));
                assert_eq!(status, 503);
                assert_eq!(redact, vec!["/data"]);
            },
            Commands::Digest { .. } => panic!("expected inspect"),
        }
    }

    #[test]
    fn inspect_requires_body_flag() {
        assert!(Cli::try_parse_from(["bastion", "inspect"]).is_err());
        assert!(Cli::try_parse_from(["bastion", "inspect", "resp.json"]).is_err());
    }
}
