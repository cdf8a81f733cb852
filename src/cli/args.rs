//! CLI argument definitions using clap
//!
//! Commands:
//! - namhatta serve --config <path> [--port <port>]
//! - namhatta validate --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Namhatta - leadership hierarchy service
#[derive(Parser, Debug)]
#[command(name = "namhatta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed the directory and serve the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./namhatta.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check configuration, seed, and audit journal without serving
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./namhatta.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["namhatta", "serve", "--config", "c.json", "--port", "9000"])
            .unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("c.json"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_default_config_path() {
        let cli = Cli::try_parse_from(["namhatta", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Validate { config } if config == PathBuf::from("./namhatta.json")
        ));
    }
}
