//! Command-line interface for army-sheet.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **parse**: Parse an army list export and print the selection
//! - **resolve**: Resolve a catalogue document set into flat unit records
//! - **generate**: Build the cheat sheet for an army list
//!
//! ## Usage
//!
//! ```text
//! # Inspect what was read from an army list
//! army-sheet parse army.txt
//!
//! # Resolve a catalogue (and its linked catalogues) once, keep the JSON
//! army-sheet -f json resolve "Imperium - Space Wolves.cat" -o space_wolves.json
//!
//! # Cheat sheet from the resolved catalogue
//! army-sheet -f yaml generate army.txt --catalogue space_wolves.json
//!
//! # Pick the catalogue by the faction named in the list
//! cat army.txt | army-sheet generate - --catalogue-dir wh40k-10e/
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::core::heuristics::Heuristics;

pub mod generate;
pub mod parse;
pub mod resolve;

#[derive(Parser)]
#[command(name = "army-sheet")]
#[command(version)]
#[command(about = "Build army reference sheets from army list exports and rules catalogues")]
#[command(
    long_about = "army-sheet reads the plain-text army list exported by list building apps and joins every selected unit with its record in a BattleScribe-style catalogue.\n\nThe result is a cheat sheet with:\n- Stats, weapons, and abilities for every unit\n- Abilities grouped by the phase they are used in\n- Faction-wide abilities listed once instead of on every unit"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON file overriding the built-in keyword heuristics
    #[arg(long, global = true)]
    pub heuristics: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an army list and print the selection
    Parse(parse::ParseArgs),

    /// Resolve catalogue documents into flat unit records
    Resolve(resolve::ResolveArgs),

    /// Generate the cheat sheet for an army list
    Generate(generate::GenerateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Heuristics from `--heuristics`, or the built-in defaults
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_heuristics(path: Option<&Path>) -> anyhow::Result<Heuristics> {
    match path {
        Some(path) => Ok(Heuristics::load_from_file(path)?),
        None => Ok(Heuristics::default()),
    }
}

/// Read a whole input file; `-` reads stdin
pub(crate) fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))
}

/// Serialize `value` for a structured format. `Text` is handled by each command.
pub(crate) fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Text => anyhow::bail!("Text output has no serialized form"),
    }
}

/// Write to `output` when given, else print to stdout
pub(crate) fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}
