use std::path::{Path, PathBuf};

use clap::Args;

use crate::catalog::builder::CatalogueResolver;
use crate::catalog::factions::{catalogue_file_for, detect_faction};
use crate::catalog::store::ResolvedCatalogue;
use crate::cli::{read_input, serialize, write_output, OutputFormat};
use crate::core::heuristics::Heuristics;
use crate::core::sheet::{CheatSheet, EnrichedUnit};
use crate::core::types::Phase;
use crate::matching::engine::CheatSheetEngine;
use crate::parsing::army_list::parse_army_list;

#[derive(Args)]
pub struct GenerateArgs {
    /// Army list export. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Catalogue to match against: a .cat document (resolved on the fly)
    /// or a .json file written by `resolve`
    #[arg(
        long,
        required_unless_present = "catalogue_dir",
        conflicts_with = "catalogue_dir"
    )]
    pub catalogue: Option<PathBuf>,

    /// Directory of .cat documents; the catalogue is picked from the
    /// faction named in the army list
    #[arg(long)]
    pub catalogue_dir: Option<PathBuf>,

    /// Do not load the catalogues linked from a .cat document
    #[arg(long)]
    pub no_linked: bool,

    /// Output file (JSON or YAML formats only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute generate subcommand
///
/// # Errors
///
/// Returns an error if the army list has no army structure, the catalogue
/// cannot be found or loaded, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: GenerateArgs,
    format: OutputFormat,
    verbose: bool,
    heuristics: &Heuristics,
) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let army = parse_army_list(&text, heuristics);
    if army.is_empty() {
        anyhow::bail!("No army structure found in {}", args.input.display());
    }

    let catalogue_path = match (&args.catalogue, &args.catalogue_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => find_catalogue(dir, &text)?,
        (None, None) => anyhow::bail!("One of --catalogue or --catalogue-dir is required"),
    };

    let resolved = load_catalogue(&catalogue_path, !args.no_linked, heuristics)?;
    let units = resolved.unit_catalogue();
    if verbose {
        eprintln!(
            "Loaded {} unit records ({} distinct) from {}",
            resolved.len(),
            units.len(),
            catalogue_path.display()
        );
    }

    let engine = CheatSheetEngine::new(&units, heuristics);
    let sheet = engine.build(&army);

    if verbose {
        let matched = sheet.all_units().filter(|u| u.matched_name.is_some()).count();
        eprintln!("Matched {matched} of {} units", sheet.unit_count());
    }

    match format {
        OutputFormat::Text => {
            if args.output.is_some() {
                anyhow::bail!("--output requires --format json or --format yaml");
            }
            print_text(&sheet);
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            write_output(&serialize(&sheet, format)?, args.output.as_deref())?;
        }
    }
    Ok(())
}

/// Catalogue file for the faction named in the list, inside `dir`
fn find_catalogue(dir: &Path, army_list: &str) -> anyhow::Result<PathBuf> {
    let faction = detect_faction(army_list)
        .ok_or_else(|| anyhow::anyhow!("Could not detect the faction of the army list"))?;
    let file = catalogue_file_for(faction)
        .ok_or_else(|| anyhow::anyhow!("No catalogue known for faction {faction}"))?;

    let path = dir.join(file);
    if !path.exists() {
        anyhow::bail!("Catalogue for {faction} not found: {}", path.display());
    }
    Ok(path)
}

fn load_catalogue(
    path: &Path,
    load_linked: bool,
    heuristics: &Heuristics,
) -> anyhow::Result<ResolvedCatalogue> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        return Ok(ResolvedCatalogue::load_from_file(path)?);
    }
    let resolver = CatalogueResolver::from_path(path, load_linked)?;
    Ok(resolver.resolve(heuristics))
}

fn print_text(sheet: &CheatSheet) {
    println!("Army: {}", sheet.army_name);
    println!("Points: {}", sheet.points);
    println!("Faction: {}", sheet.faction);
    if !sheet.detachment.is_empty() {
        println!("Detachment: {}", sheet.detachment);
    }
    println!("Characters: {}", sheet.characters.len());
    println!("Units: {}", sheet.units.len());

    if !sheet.faction_abilities.is_empty() {
        println!("\nFaction abilities:");
        for ability in &sheet.faction_abilities {
            println!("  {}", ability.name);
        }
    }

    for unit in sheet.all_units() {
        println!("\n{}", "─".repeat(60));
        print_unit(unit);
    }
}

fn print_unit(unit: &EnrichedUnit) {
    let warlord = if unit.warlord { " [Warlord]" } else { "" };
    println!("{} ({} pts){warlord}", unit.name, unit.points);
    match &unit.matched_name {
        Some(matched) if *matched != unit.name => println!("  Matched: {matched}"),
        Some(_) => {}
        None => println!("  No catalogue entry"),
    }
    for enhancement in &unit.enhancements {
        println!("  Enhancement: {enhancement}");
    }

    if let Some(stats) = &unit.stats {
        println!(
            "  M {}  T {}  Sv {}  W {}  Ld {}  OC {}",
            stats.movement,
            stats.toughness,
            stats.save,
            stats.wounds,
            stats.leadership,
            stats.objective_control
        );
    }

    if !unit.passive_abilities.is_empty() {
        let badges: Vec<&str> = unit
            .passive_abilities
            .iter()
            .map(|p| p.badge.as_str())
            .collect();
        println!("  {}", badges.join(" | "));
    }

    for (label, rows) in [("Ranged", &unit.weapons.ranged), ("Melee", &unit.weapons.melee)] {
        for row in rows {
            println!(
                "  {label:<6} {}x {:<28} {:>4} A{} {} S{} AP{} D{} {}",
                row.count,
                row.name,
                row.range,
                row.attacks,
                row.skill,
                row.strength,
                row.ap,
                row.damage,
                row.keywords
            );
        }
    }

    for phase in Phase::ALL {
        for ability in unit.abilities_by_phase.get(phase) {
            println!("  [{phase}] {}", ability.name);
        }
    }
}
