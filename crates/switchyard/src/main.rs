// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - a complexity-routing LLM proxy.
//!
//! This is the binary entry point for the proxy.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod serve;
mod shutdown;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchyard_config::{ConfigError, SwitchyardConfig};

/// Switchyard - a complexity-routing LLM proxy.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the proxy server.
    Serve,
    /// Classify a chat-completion request body and print the routing decision.
    Classify {
        /// Path to a JSON request body.
        file: PathBuf,
        /// Print the decision as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration as TOML.
    Config,
    /// Query a running proxy's health endpoint.
    Status {
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SwitchyardConfig, Vec<ConfigError>> {
    match path {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    }
}

/// Resolved configuration with secrets masked, as TOML.
fn render_config(config: &SwitchyardConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&shown)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Classify { file, json }) => classify::run_classify(&config, &file, json),
        Some(Commands::Config) => match render_config(&config) {
            Ok(text) => {
                print!("{text}");
                Ok(())
            }
            Err(e) => Err(switchyard_core::SwitchyardError::Internal(format!(
                "failed to render config: {e}"
            ))),
        },
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        None => {
            println!("switchyard: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("switchyard: {e}");
        std::process::exit(1);
    }
}
