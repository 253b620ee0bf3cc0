//! Command-line interface for fieldrecorder.
//!
//! This module provides the CLI structure for the `fieldrec` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ConvertCommand, DatumArg, LocateCommand, TrackCommand};

/// fieldrec - GPS positions to Ordnance Survey grid references
///
/// Converts latitude/longitude from a GPS fix into the two-letter National
/// Grid reference recorded against finds and permissions, and back again.
#[derive(Debug, Parser)]
#[command(name = "fieldrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert latitude/longitude to a grid reference
    Convert(ConvertCommand),

    /// Find the latitude/longitude of a grid reference
    Locate(LocateCommand),

    /// Convert every point of a recorded GPS trail
    Track(TrackCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Command {
    /// Whether the command runs against the loaded configuration.
    ///
    /// `config path` and `config validate` inspect files themselves, so a
    /// broken config file must not stop them from running.
    #[must_use]
    pub fn needs_config(&self) -> bool {
        !matches!(
            self,
            Self::Config(ConfigCommand::Path | ConfigCommand::Validate { .. })
        )
    }
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
