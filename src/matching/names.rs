use serde::{Deserialize, Serialize};

use crate::catalog::store::UnitCatalogue;
use crate::core::unit::CatalogueUnit;
use crate::utils::text::{names_overlap, normalize_name};

/// How a selection name was matched to a catalogue record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    Exact,
    CaseInsensitive,
    /// One name contains the other
    Containment,
}

/// Share of the longer name covered by the shorter one, in `(0, 1]`
fn containment_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = (a.chars().count(), b.chars().count());
    let (short, long) = if a <= b { (a, b) } else { (b, a) };
    if long == 0 {
        return 0.0;
    }
    short as f64 / long as f64
}

/// Find the catalogue record for a selected unit name.
///
/// Exact name first, then case-insensitive exact, then names where one
/// contains the other. Among containment candidates the one whose length is
/// closest to the selection name wins; remaining ties go to the record
/// encountered first in the catalogue.
pub fn find_unit<'c>(catalogue: &'c UnitCatalogue, name: &str) -> Option<(&'c CatalogueUnit, NameMatch)> {
    if let Some(unit) = catalogue.get(name) {
        return Some((unit, NameMatch::Exact));
    }
    if let Some(unit) = catalogue.get_case_insensitive(name) {
        return Some((unit, NameMatch::CaseInsensitive));
    }

    let wanted = normalize_name(name);
    let mut best: Option<(&CatalogueUnit, f64)> = None;
    for unit in catalogue.units() {
        let candidate = normalize_name(&unit.name);
        if !names_overlap(&wanted, &candidate) {
            continue;
        }
        let ratio = containment_ratio(&wanted, &candidate);
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((unit, ratio));
        }
    }
    best.map(|(unit, _)| (unit, NameMatch::Containment))
}
