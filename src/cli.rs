//! Command-line argument parsing for the layout inspector
//!
//! Supports:
//! - Printing the restored region tree of each window
//! - Checking a layout file for corrupt records

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config_paths;

/// Inspect persisted dock layouts
#[derive(Parser, Debug)]
#[command(name = "dockyard", version, about = "Inspect persisted dock layouts")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Print the region tree of every window in a layout file
    Inspect {
        /// Layout file (defaults to the user layout)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Report corrupt records; exits non-zero if any are found
    Check {
        /// Layout file (defaults to the user layout)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// What to do with the layout file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectMode {
    Inspect,
    Check,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub mode: InspectMode,
    pub path: PathBuf,
}

impl CliArgs {
    /// Convert parsed CLI args into a resolved configuration
    pub fn into_config(self) -> Result<InspectConfig, String> {
        let (mode, file) = match self.command {
            CliCommand::Inspect { file } => (InspectMode::Inspect, file),
            CliCommand::Check { file } => (InspectMode::Check, file),
        };
        let path = match file {
            Some(path) => path,
            None => config_paths::layout_file()
                .ok_or_else(|| "Could not determine the layout file location".to_string())?,
        };
        Ok(InspectConfig { mode, path })
    }
}
