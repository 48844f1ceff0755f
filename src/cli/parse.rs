use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_input, serialize, write_output, OutputFormat};
use crate::core::army::ArmySelection;
use crate::core::heuristics::Heuristics;
use crate::core::types::Section;
use crate::parsing::army_list::parse_army_list;

#[derive(Args)]
pub struct ParseArgs {
    /// Army list export. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute parse subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or contains no army structure.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ParseArgs,
    format: OutputFormat,
    verbose: bool,
    heuristics: &Heuristics,
) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let army = parse_army_list(&text, heuristics);
    if army.is_empty() {
        anyhow::bail!("No army structure found in {}", args.input.display());
    }

    if verbose {
        eprintln!("Parsed {} units", army.unit_count());
    }

    match format {
        OutputFormat::Text => print_text(&army),
        OutputFormat::Json | OutputFormat::Yaml => write_output(&serialize(&army, format)?, None)?,
    }
    Ok(())
}

fn print_text(army: &ArmySelection) {
    println!("Army: {} ({} points)", army.name, army.points);
    println!("Faction: {}", army.faction);
    if !army.detachment.is_empty() {
        println!("Detachment: {}", army.detachment);
    }

    for section in [Section::Characters, Section::Battleline, Section::Other] {
        let units = army.section(section);
        if units.is_empty() {
            continue;
        }
        println!("\n{section} ({})", units.len());
        for unit in units {
            let warlord = if unit.warlord { " [Warlord]" } else { "" };
            println!("  {} - {} pts{warlord}", unit.name, unit.points);
            for enhancement in &unit.enhancements {
                println!("    Enhancement: {enhancement}");
            }
            for item in &unit.wargear {
                println!("    {}x {}", item.count, item.name);
            }
            for model in &unit.models {
                let weapons: Vec<String> = model
                    .weapons
                    .iter()
                    .map(|w| format!("{}x {}", w.count, w.name))
                    .collect();
                println!("    {}x {}: {}", model.count, model.name, weapons.join(", "));
            }
        }
    }
}
