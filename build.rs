use std::collections::{HashMap, HashSet};
use std::path::Path;

const FACTION_TABLE: &str = "catalogs/factions.json";

fn main() {
    println!("cargo:rerun-if-changed={FACTION_TABLE}");
    println!("cargo:rerun-if-changed=build.rs");

    let path = Path::new(FACTION_TABLE);
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        panic!("\n\nFACTION TABLE BUILD ERROR: cannot read {}: {e}\n", path.display())
    });
    let table: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!("\n\nFACTION TABLE BUILD ERROR: {} is not valid JSON: {e}\n", path.display())
    });

    match check_table(&table) {
        Ok(summary) => println!(
            "cargo:warning=Validated faction table v{}: {} factions over {} catalogues",
            summary.version, summary.factions, summary.catalogues
        ),
        Err(problems) => panic!(
            "\n\nFACTION TABLE BUILD ERROR: {} problem(s) in {}\n  - {}\n",
            problems.len(),
            path.display(),
            problems.join("\n  - ")
        ),
    }
}

struct TableSummary<'a> {
    version: &'a str,
    factions: usize,
    catalogues: usize,
}

/// Every problem in the table, or the counts of a valid one.
///
/// Several faction names may share one catalogue (aliases such as `Tau
/// Empire`), but a faction name may appear only once since lookup is
/// case-insensitive.
fn check_table(table: &serde_json::Value) -> Result<TableSummary<'_>, Vec<String>> {
    let mut problems = Vec::new();

    let version = table.get("version").and_then(|v| v.as_str()).unwrap_or_default();
    if version.split('.').count() != 3 || !version.split('.').all(|p| p.parse::<u32>().is_ok()) {
        problems.push(format!("'version' must look like 1.0.0, got {version:?}"));
    }

    let Some(entries) = table.get("factions").and_then(|f| f.as_array()) else {
        problems.push("missing top-level 'factions' array".to_string());
        return Err(problems);
    };
    if entries.is_empty() {
        problems.push("'factions' is empty".to_string());
    }

    let mut names: HashMap<String, usize> = HashMap::new();
    let mut catalogues: HashSet<&str> = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let name = entry.get("name").and_then(|v| v.as_str()).unwrap_or_default().trim();
        if name.is_empty() {
            problems.push(format!("entry {index} has no name"));
        } else if let Some(first) = names.insert(name.to_lowercase(), index) {
            problems.push(format!("faction '{name}' at entry {index} duplicates entry {first}"));
        }

        let catalogue = entry.get("catalogue").and_then(|v| v.as_str()).unwrap_or_default();
        if !catalogue.ends_with(".cat") {
            problems.push(format!("entry {index} ('{name}'): catalogue {catalogue:?} is not a .cat file"));
        } else if catalogue.contains(['/', '\\']) {
            problems.push(format!("entry {index} ('{name}'): catalogue {catalogue:?} must be a bare file name"));
        } else {
            catalogues.insert(catalogue);
        }
    }

    if problems.is_empty() {
        Ok(TableSummary {
            version,
            factions: entries.len(),
            catalogues: catalogues.len(),
        })
    } else {
        Err(problems)
    }
}
