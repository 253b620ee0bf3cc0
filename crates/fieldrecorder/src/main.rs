//! `fieldrec` - CLI for fieldrecorder
//!
//! This binary converts GPS positions to National Grid references, looks up
//! grid references, converts recorded trails and inspects configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use fieldrecorder::cli::{Cli, Command, ConfigCommand, ConvertCommand, LocateCommand, TrackCommand};
use fieldrecorder::{init_logging, Config, Converter, GeodeticCoordinate, GridReference, Track};

/// Printed in place of a grid reference for positions off the grid.
const OUT_OF_RANGE: &str = "out of grid range";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = if cli.command.needs_config() {
        Config::load_from(cli.config.clone()).context("loading configuration")?
    } else {
        Config::default()
    };

    // Execute the command
    match cli.command {
        Command::Convert(cmd) => handle_convert(&config, &cmd),
        Command::Locate(cmd) => handle_locate(&config, &cmd),
        Command::Track(cmd) => handle_track(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cli.config, cmd),
    }
}

fn converter_for(config: &Config, datum: Option<fieldrecorder::cli::DatumArg>) -> Converter {
    match datum {
        Some(datum) => Converter::with_datum(datum.into()),
        None => config.converter(),
    }
}

fn handle_convert(config: &Config, cmd: &ConvertCommand) -> anyhow::Result<()> {
    let converter = converter_for(config, cmd.datum);
    let reference = converter
        .to_grid_reference(GeodeticCoordinate::new(cmd.latitude, cmd.longitude))
        .context("converting coordinate")?;

    if cmd.json || config.output.json {
        let out = serde_json::json!({
            "latitude": cmd.latitude,
            "longitude": cmd.longitude,
            "datum": converter.options().datum,
            "grid_reference": reference,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match reference {
            Some(r) => println!("{r}"),
            None => println!("{OUT_OF_RANGE}"),
        }
    }
    Ok(())
}

fn handle_locate(config: &Config, cmd: &LocateCommand) -> anyhow::Result<()> {
    let converter = converter_for(config, cmd.datum);
    let reference: GridReference = cmd
        .reference
        .parse()
        .with_context(|| format!("parsing grid reference '{}'", cmd.reference))?;
    let coord = converter.to_geodetic(&reference)?;
    let centre = reference.centre();

    if cmd.json || config.output.json {
        let out = serde_json::json!({
            "grid_reference": reference,
            "easting_m": centre.easting_m,
            "northing_m": centre.northing_m,
            "datum": converter.options().datum,
            "latitude": coord.latitude_deg,
            "longitude": coord.longitude_deg,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Grid reference:    {reference}");
        println!(
            "Easting/Northing:  {:.0} {:.0}",
            centre.easting_m, centre.northing_m
        );
        println!(
            "Lat/Lon:           {:.6} {:.6}",
            coord.latitude_deg, coord.longitude_deg
        );
    }
    Ok(())
}

fn handle_track(config: &Config, cmd: &TrackCommand) -> anyhow::Result<()> {
    let mut policy = config.track_policy();
    if let Some(limit) = cmd.max_accuracy {
        anyhow::ensure!(
            limit.is_finite() && limit > 0.0,
            "--max-accuracy must be a positive number"
        );
        policy.max_accuracy_m = limit;
    }

    let converter = config.converter();
    let track = Track::load(&cmd.file, &policy)?;
    let references = track.grid_references(&converter);

    if cmd.json || config.output.json {
        let rows: Vec<_> = track
            .points
            .iter()
            .zip(&references)
            .map(|(fix, reference)| {
                serde_json::json!({
                    "captured_at": fix.captured_at,
                    "latitude": fix.latitude,
                    "longitude": fix.longitude,
                    "accuracy_m": fix.accuracy_m,
                    "grid_reference": reference.as_ref().ok().copied().flatten(),
                    "error": reference.as_ref().err().map(ToString::to_string),
                })
            })
            .collect();
        let out = serde_json::json!({ "name": track.name, "points": rows });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Track: {} ({} points)", track.name, track.len());
        for (fix, reference) in track.points.iter().zip(&references) {
            let shown = match reference {
                Ok(Some(r)) => r.to_string(),
                Ok(None) => OUT_OF_RANGE.to_string(),
                Err(e) => e.to_string(),
            };
            println!(
                "{}  {:>10.6} {:>11.6}  {shown}",
                fix.captured_at.format("%Y-%m-%d %H:%M:%S"),
                fix.latitude,
                fix.longitude
            );
        }
    }
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Conversion]");
                println!("  Datum:              {}", config.conversion.datum);
                println!();
                println!("[Track]");
                println!("  Max accuracy (m):   {}", config.track.max_accuracy_m);
                println!();
                println!("[Output]");
                println!("  JSON:               {}", config.output.json);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
