use tracing::{debug, warn};

use crate::catalog::store::UnitCatalogue;
use crate::core::army::{ArmySelection, UnitSelection};
use crate::core::heuristics::Heuristics;
use crate::core::sheet::{CheatSheet, EnrichedUnit, PhaseAbilities, WeaponSet};
use crate::core::types::{Section, UnitType};
use crate::matching::abilities::partition_abilities;
use crate::matching::faction::extract_faction_abilities;
use crate::matching::names::find_unit;
use crate::matching::weapons::{select_weapons, SelectedItems};
use crate::parsing::army_list::parse_army_list;

/// Joins army selections with catalogue records into a cheat sheet.
///
/// Holds only shared references; one engine can serve any number of army
/// lists against the same catalogue.
pub struct CheatSheetEngine<'a> {
    catalogue: &'a UnitCatalogue,
    heuristics: &'a Heuristics,
}

impl<'a> CheatSheetEngine<'a> {
    pub fn new(catalogue: &'a UnitCatalogue, heuristics: &'a Heuristics) -> Self {
        Self {
            catalogue,
            heuristics,
        }
    }

    /// Parse an army list export and build its cheat sheet
    pub fn generate(&self, army_list: &str) -> CheatSheet {
        let army = parse_army_list(army_list, self.heuristics);
        self.build(&army)
    }

    /// Build the cheat sheet for a parsed army.
    ///
    /// Characters come first with warlords leading, then battleline and other
    /// units. Faction abilities are hoisted to the sheet and every unit-level
    /// display of a faction-flavored rule is removed.
    pub fn build(&self, army: &ArmySelection) -> CheatSheet {
        let (warlords, others): (Vec<_>, Vec<_>) =
            army.characters.iter().partition(|unit| unit.warlord);
        let characters: Vec<EnrichedUnit> = warlords
            .into_iter()
            .chain(others)
            .map(|unit| self.enrich_unit(unit, Section::Characters))
            .collect();

        let units: Vec<EnrichedUnit> = army
            .battleline
            .iter()
            .map(|unit| self.enrich_unit(unit, Section::Battleline))
            .chain(
                army.other_units
                    .iter()
                    .map(|unit| self.enrich_unit(unit, Section::Other)),
            )
            .collect();

        let faction = extract_faction_abilities(characters.iter().chain(&units), self.heuristics);
        debug!(
            promoted = faction.promoted.len(),
            flavored = faction.flavored.len(),
            "Extracted faction abilities"
        );

        let strip = |unit: EnrichedUnit| unit.without_rules(&faction.flavored);
        CheatSheet {
            army_name: army.name.clone(),
            points: army.points,
            faction: army.faction.clone(),
            detachment: army.detachment.clone(),
            characters: characters.into_iter().map(strip).collect(),
            units: units.into_iter().map(strip).collect(),
            faction_abilities: faction.promoted,
        }
    }

    /// Join one selection with its catalogue record.
    ///
    /// An unmatched selection keeps only its own fields.
    pub fn enrich_unit(&self, selection: &UnitSelection, section: Section) -> EnrichedUnit {
        let mut enriched = EnrichedUnit {
            name: selection.name.clone(),
            points: selection.points,
            warlord: selection.warlord,
            enhancements: selection.enhancements.clone(),
            selected_wargear: selection.wargear.clone(),
            selected_models: selection.models.clone(),
            unit_type: UnitType::from_section(section),
            matched_name: None,
            is_character: section == Section::Characters,
            stats: None,
            abilities_by_phase: PhaseAbilities::default(),
            passive_abilities: Vec::new(),
            weapons: WeaponSet::default(),
            categories: Vec::new(),
            faction_keywords: Vec::new(),
        };

        let Some((record, how)) = find_unit(self.catalogue, &selection.name) else {
            warn!(unit = %selection.name, "No catalogue entry for unit");
            return enriched;
        };
        debug!(unit = %selection.name, matched = %record.name, how = ?how, "Matched unit");

        let (by_phase, passive) = partition_abilities(&record.abilities, self.heuristics);
        let is_character = record.is_character();
        let selected = SelectedItems::from_unit(selection);

        enriched.matched_name = Some(record.name.clone());
        enriched.is_character = is_character;
        enriched.stats.clone_from(&record.stats);
        enriched.abilities_by_phase = by_phase;
        enriched.passive_abilities = passive;
        enriched.weapons = select_weapons(&record.weapons, &selected, is_character);
        enriched.categories.clone_from(&record.categories);
        enriched.faction_keywords.clone_from(&record.faction_keywords);
        enriched
    }
}
