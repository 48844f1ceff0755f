//! Faction names and the catalogue document each one is published in.
//!
//! The table is embedded at compile time (validated by `build.rs`) and used
//! to pick a catalogue for an army list when only a catalogue directory is
//! given.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// Only the head of an export names the faction
const DETECTION_LINE_LIMIT: usize = 10;

/// Lines containing any of these are never faction lines
const NON_FACTION_MARKERS: [&str; 4] = ["Points)", "Strike Force", "Detachment", "Saga of"];

/// Generic faction that a chapter-specific one overrides
const GENERIC_FACTION: &str = "Space Marines";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionEntry {
    pub name: String,
    /// Catalogue file name, e.g. `Imperium - Space Wolves.cat`
    pub catalogue: String,
}

#[derive(Debug, Deserialize)]
struct FactionTable {
    factions: Vec<FactionEntry>,
}

static FACTIONS: LazyLock<Vec<FactionEntry>> = LazyLock::new(|| {
    const EMBEDDED_TABLE: &str = include_str!("../../catalogs/factions.json");
    match serde_json::from_str::<FactionTable>(EMBEDDED_TABLE) {
        Ok(table) => table.factions,
        Err(e) => {
            warn!(error = %e, "Embedded faction table is invalid");
            Vec::new()
        }
    }
});

/// All known factions in table order
pub fn known_factions() -> &'static [FactionEntry] {
    &FACTIONS
}

/// Catalogue file for a faction name (case-insensitive)
pub fn catalogue_file_for(faction: &str) -> Option<&'static str> {
    let faction = faction.trim();
    known_factions()
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(faction))
        .map(|f| f.catalogue.as_str())
}

/// Detect the faction named at the top of an army list export.
///
/// Every known faction mentioned in the first lines is collected; the
/// generic "Space Marines" is dropped when a more specific faction is also
/// present, and the longest remaining name wins.
pub fn detect_faction(army_list: &str) -> Option<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();

    for line in army_list.trim().lines().take(DETECTION_LINE_LIMIT) {
        let line = line.trim();
        if line.is_empty() || NON_FACTION_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }
        let lower = line.to_lowercase();
        for faction in known_factions() {
            let name = faction.name.as_str();
            if lower.contains(&name.to_lowercase()) && !found.contains(&name) {
                found.push(name);
            }
        }
    }

    if found.len() > 1 {
        found.retain(|f| *f != GENERIC_FACTION);
    }
    // Stable sort keeps table order among equal lengths
    found.sort_by_key(|f| std::cmp::Reverse(f.len()));
    found.first().copied()
}
