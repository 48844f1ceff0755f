use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::unit::CatalogueUnit;
use crate::parsing::xml::XmlError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalogue document: {0}")]
    Xml(#[from] XmlError),

    #[error("Failed to parse resolved catalogue: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a catalogue document (root element <{0}>)")]
    NotACatalogue(String),
}

/// Resolved catalogue format version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Flat unit records resolved from a document set, in encounter order.
///
/// This is the serializable form; duplicates by name are kept as separate
/// fragments and only merged when a [`UnitCatalogue`] is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCatalogue {
    pub version: String,
    pub created_at: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    pub units: Vec<CatalogueUnit>,
}

impl ResolvedCatalogue {
    pub fn new(name: impl Into<String>, revision: Option<String>, units: Vec<CatalogueUnit>) -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            name: name.into(),
            revision,
            units,
        }
    }

    /// Load a previously resolved catalogue from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: Self = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                expected = CATALOG_VERSION,
                found = %data.version,
                "Resolved catalogue version mismatch"
            );
        }
        Ok(data)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Merge fragments into a name-keyed catalogue for reconciliation
    pub fn unit_catalogue(&self) -> UnitCatalogue {
        UnitCatalogue::from_units(self.units.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Name-keyed unit records with duplicate fragments merged.
///
/// Read-only once built; iteration order is first-encounter order of each name.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalogue {
    units: Vec<CatalogueUnit>,

    /// Index: exact name -> index in units
    by_name: HashMap<String, usize>,

    /// Index: lowercase name -> index of the first unit with that lowercase name
    by_lowercase_name: HashMap<String, usize>,
}

impl UnitCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: impl IntoIterator<Item = CatalogueUnit>) -> Self {
        let mut catalogue = Self::new();
        for unit in units {
            catalogue.add_unit(unit);
        }
        debug!(units = catalogue.len(), "Built unit catalogue");
        catalogue
    }

    /// Add a unit, merging it into an existing record of the same name
    pub fn add_unit(&mut self, unit: CatalogueUnit) {
        if let Some(&idx) = self.by_name.get(&unit.name) {
            self.units[idx].merge_from(&unit);
            return;
        }

        let idx = self.units.len();
        self.by_name.insert(unit.name.clone(), idx);
        self.by_lowercase_name
            .entry(unit.name.to_lowercase())
            .or_insert(idx);
        self.units.push(unit);
    }

    pub fn get(&self, name: &str) -> Option<&CatalogueUnit> {
        self.by_name.get(name).map(|&idx| &self.units[idx])
    }

    pub fn get_case_insensitive(&self, name: &str) -> Option<&CatalogueUnit> {
        self.by_lowercase_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.units[idx])
    }

    /// All units in first-encounter order
    pub fn units(&self) -> &[CatalogueUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Phase, WeaponKind};
    use crate::core::unit::{Ability, StatBlock, WeaponProfile};
    use proptest::prelude::*;

    fn unit_with(name: &str, ability: &str) -> CatalogueUnit {
        let mut unit = CatalogueUnit::new(name);
        unit.abilities.push(Ability::new(ability, "", Phase::Any));
        unit
    }

    #[test]
    fn test_duplicate_fragments_are_merged() {
        let mut linked = unit_with("Gladiator Lancer", "Deadly Demise D3");
        linked.source_catalogue = Some("Imperium - Space Marines".to_string());
        linked.stats = Some(StatBlock::default());

        let catalogue = UnitCatalogue::from_units([
            unit_with("Gladiator Lancer", "Armoured Hull"),
            unit_with("Blood Claws", "Berserk Charge"),
            linked,
        ]);

        assert_eq!(catalogue.len(), 2);
        let lancer = catalogue.get("Gladiator Lancer").unwrap();
        assert_eq!(lancer.abilities.len(), 2);
        assert!(lancer.stats.is_some());
        // First fragment stays the record's identity
        assert_eq!(lancer.source_catalogue, None);
        assert_eq!(catalogue.units()[1].name, "Blood Claws");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalogue = UnitCatalogue::from_units([unit_with("Wolf Scouts", "Scout")]);
        assert!(catalogue.get("wolf scouts").is_none());
        assert_eq!(
            catalogue.get_case_insensitive("WOLF SCOUTS").map(|u| u.name.as_str()),
            Some("Wolf Scouts")
        );
    }

    #[test]
    fn test_resolved_catalogue_json() {
        let resolved = ResolvedCatalogue::new(
            "Imperium - Space Wolves",
            Some("42".to_string()),
            vec![unit_with("Logan Grimnar", "Leader")],
        );
        let json = resolved.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"created_at\""));

        let loaded = ResolvedCatalogue::from_json(&json).unwrap();
        assert_eq!(loaded, resolved);
        assert_eq!(loaded.unit_catalogue().len(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ResolvedCatalogue::from_json("{not json"),
            Err(CatalogError::Json(_))
        ));
    }

    fn fragment(idx: usize, with_stats: bool) -> CatalogueUnit {
        let mut unit = CatalogueUnit::new("Grey Hunters");
        unit.abilities.push(Ability::new(format!("Ability {idx}"), "", Phase::Any));
        unit.weapons
            .push(WeaponProfile::new(format!("Weapon {idx}"), WeaponKind::Ranged));
        unit.categories.push(format!("Category {idx}"));
        if with_stats {
            unit.stats = Some(StatBlock::from_characteristics([("M", "6\"")]));
        }
        unit
    }

    fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
        let mut items = items.to_vec();
        items.sort();
        items
    }

    proptest! {
        #[test]
        fn prop_merge_is_order_independent_for_disjoint_fragments(
            order in Just(vec![0usize, 1, 2]).prop_shuffle(),
            stats_on in 0usize..3,
        ) {
            let fragments: Vec<_> = (0..3).map(|i| fragment(i, i == stats_on)).collect();
            let in_order = UnitCatalogue::from_units(fragments.clone());
            let shuffled = UnitCatalogue::from_units(order.iter().map(|&i| fragments[i].clone()));

            let a = in_order.get("Grey Hunters").unwrap();
            let b = shuffled.get("Grey Hunters").unwrap();

            prop_assert_eq!(&a.stats, &b.stats);
            let names = |u: &CatalogueUnit| {
                sorted(&u.abilities.iter().map(|x| x.name.clone()).collect::<Vec<_>>())
            };
            prop_assert_eq!(names(a), names(b));
            let weapons = |u: &CatalogueUnit| {
                sorted(&u.weapons.iter().map(|w| w.name.clone()).collect::<Vec<_>>())
            };
            prop_assert_eq!(weapons(a), weapons(b));
            prop_assert_eq!(sorted(&a.categories), sorted(&b.categories));
        }
    }
}
