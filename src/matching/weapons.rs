//! Weapon selection, counting, and aggregation for enriched units.

use std::collections::HashMap;

use crate::core::army::UnitSelection;
use crate::core::sheet::{WeaponRow, WeaponSet};
use crate::core::types::WeaponKind;
use crate::core::unit::WeaponProfile;
use crate::utils::text::{names_overlap, normalize_name};

/// Selection-side item names (normalized) with their counts
#[derive(Debug, Clone, Default)]
pub struct SelectedItems {
    items: Vec<(String, u32)>,
}

impl SelectedItems {
    /// Wargear and model weapons of a unit selection
    pub fn from_unit(unit: &UnitSelection) -> Self {
        Self {
            items: unit
                .selected_items()
                .map(|item| (normalize_name(&item.name), item.count))
                .collect(),
        }
    }

    /// True when the list gave no equipment at all (default loadout)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if any selected name overlaps the weapon name
    pub fn matches(&self, weapon_name: &str) -> bool {
        let weapon = normalize_name(weapon_name);
        self.items.iter().any(|(name, _)| names_overlap(&weapon, name))
    }

    /// Number of copies selected.
    ///
    /// Exact (normalized) name matches are summed; without any, overlapping
    /// names are summed instead; without those either the count is 1.
    /// Sums saturate at `u32::MAX`.
    pub fn count_for(&self, weapon_name: &str) -> u32 {
        let weapon = normalize_name(weapon_name);

        let exact = self
            .items
            .iter()
            .filter(|(name, _)| *name == weapon)
            .fold(0u32, |acc, (_, count)| acc.saturating_add(*count));
        if exact > 0 {
            return exact;
        }

        let overlapping = self
            .items
            .iter()
            .filter(|(name, _)| names_overlap(&weapon, name))
            .fold(0u32, |acc, (_, count)| acc.saturating_add(*count));
        overlapping.max(1)
    }
}

/// Profiles with exact duplicates removed, first occurrence kept
pub fn dedup_profiles(profiles: &[WeaponProfile]) -> Vec<&WeaponProfile> {
    let mut unique: Vec<&WeaponProfile> = Vec::new();
    for profile in profiles {
        if !unique.contains(&profile) {
            unique.push(profile);
        }
    }
    unique
}

/// Sum the counts of rows with identical display values, keeping first-seen order.
/// Counts saturate at `u32::MAX`.
pub fn aggregate_rows(rows: Vec<WeaponRow>) -> Vec<WeaponRow> {
    let mut positions: HashMap<[String; 8], usize> = HashMap::new();
    let mut aggregated: Vec<WeaponRow> = Vec::new();

    for row in rows {
        let key = row.display_key().map(str::to_string);
        if let Some(&idx) = positions.get(&key) {
            let merged = &mut aggregated[idx];
            merged.count = merged.count.saturating_add(row.count);
            continue;
        }
        positions.insert(key, aggregated.len());
        aggregated.push(row);
    }
    aggregated
}

/// Build the weapon rows of an enriched unit.
///
/// A catalogue weapon is shown when its name overlaps a selected item, or
/// unconditionally when nothing was selected. Rows of non-character units
/// are aggregated.
pub fn select_weapons(
    profiles: &[WeaponProfile],
    selected: &SelectedItems,
    is_character: bool,
) -> WeaponSet {
    let mut set = WeaponSet::default();

    for profile in dedup_profiles(profiles) {
        if !selected.is_empty() && !selected.matches(&profile.name) {
            continue;
        }
        let row = WeaponRow::from_profile(profile, selected.count_for(&profile.name));
        match profile.kind {
            WeaponKind::Ranged => set.ranged.push(row),
            WeaponKind::Melee => set.melee.push(row),
        }
    }

    if !is_character {
        set.ranged = aggregate_rows(set.ranged);
        set.melee = aggregate_rows(set.melee);
    }
    set
}
