//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::convert::Datum;

/// Convert command arguments.
#[derive(Debug, Args)]
pub struct ConvertCommand {
    /// Latitude in decimal degrees
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in decimal degrees (negative is west)
    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,

    /// Datum handling, overriding the configuration
    #[arg(short, long, value_enum)]
    pub datum: Option<DatumArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Locate command arguments.
#[derive(Debug, Args)]
pub struct LocateCommand {
    /// Grid reference, e.g. "TQ 2991 8043" or TQ29918043
    pub reference: String,

    /// Datum handling, overriding the configuration
    #[arg(short, long, value_enum)]
    pub datum: Option<DatumArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Track command arguments.
#[derive(Debug, Args)]
pub struct TrackCommand {
    /// JSON file holding an array of fixes or a track object
    pub file: PathBuf,

    /// Worst accuracy in metres to keep after the first point
    #[arg(long, value_name = "METRES")]
    pub max_accuracy: Option<f64>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Datum argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatumArg {
    /// Treat GPS positions as OSGB36 (no shift)
    Airy,
    /// Shift from WGS84 with the OS Helmert parameters
    Helmert,
}

impl From<DatumArg> for Datum {
    fn from(arg: DatumArg) -> Self {
        match arg {
            DatumArg::Airy => Self::Airy,
            DatumArg::Helmert => Self::Helmert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_arg_conversion() {
        assert_eq!(Datum::from(DatumArg::Airy), Datum::Airy);
        assert_eq!(Datum::from(DatumArg::Helmert), Datum::Helmert);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_track_command_debug() {
        let cmd = TrackCommand {
            file: PathBuf::from("walk.json"),
            max_accuracy: Some(20.0),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("walk.json"));
        assert!(debug_str.contains("max_accuracy"));
    }
}
