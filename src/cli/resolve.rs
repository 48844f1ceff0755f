use std::path::PathBuf;

use clap::Args;

use crate::catalog::builder::CatalogueResolver;
use crate::catalog::store::ResolvedCatalogue;
use crate::cli::{serialize, write_output, OutputFormat};
use crate::core::heuristics::Heuristics;
use crate::utils::validation::DEFAULT_LINK_DEPTH;

#[derive(Args)]
pub struct ResolveArgs {
    /// Primary catalogue document (.cat)
    #[arg(required = true)]
    pub catalogue: PathBuf,

    /// Do not load the catalogues linked from the primary document
    #[arg(long)]
    pub no_linked: bool,

    /// Only emit units defined in the primary document
    #[arg(long)]
    pub primary_only: bool,

    /// Entry-link hops followed when collecting weapons
    #[arg(long, default_value_t = DEFAULT_LINK_DEPTH)]
    pub link_depth: usize,

    /// Output file. With text format the resolved catalogue is written as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute resolve subcommand
///
/// # Errors
///
/// Returns an error if the primary document cannot be loaded or the output
/// cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ResolveArgs,
    format: OutputFormat,
    verbose: bool,
    heuristics: &Heuristics,
) -> anyhow::Result<()> {
    let resolver = CatalogueResolver::from_path(&args.catalogue, !args.no_linked)?
        .include_linked_units(!args.primary_only)
        .with_link_depth(args.link_depth);

    if verbose {
        eprintln!(
            "Loaded {} with {} linked catalogue(s)",
            resolver.primary().name,
            resolver.linked_documents().len()
        );
    }

    let resolved = resolver.resolve(heuristics);
    if resolved.is_empty() {
        eprintln!("Warning: No units found in {}", args.catalogue.display());
    }

    match (format, args.output.as_deref()) {
        (OutputFormat::Text, None) => print_text(&resolved),
        (OutputFormat::Text | OutputFormat::Json, output) => {
            write_output(&resolved.to_json()?, output)?;
        }
        (OutputFormat::Yaml, output) => write_output(&serialize(&resolved, format)?, output)?,
    }
    Ok(())
}

fn print_text(resolved: &ResolvedCatalogue) {
    println!("Catalogue: {}", resolved.name);
    if let Some(revision) = &resolved.revision {
        println!("Revision: {revision}");
    }
    println!("Units: {}", resolved.len());
    println!();

    for unit in &resolved.units {
        let points = unit
            .points
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let source = unit
            .source_catalogue
            .as_deref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_default();
        println!(
            "{:<40} {:>5} pts  {:>2} abilities  {:>2} weapons{source}",
            unit.name,
            points,
            unit.abilities.len(),
            unit.weapons.len(),
        );
    }
}
