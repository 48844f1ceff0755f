use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::core::types::Section;

/// A named item with a count, e.g. `2x Fragstorm grenade launcher`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub name: String,
    pub count: u32,
}

impl ItemCount {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A group of identical models inside a multi-model unit, with their weapons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub weapons: Vec<ItemCount>,
}

impl ModelSelection {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            weapons: Vec::new(),
        }
    }
}

/// One unit as chosen in the army list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSelection {
    pub name: String,
    pub points: u32,
    #[serde(default)]
    pub warlord: bool,
    #[serde(default)]
    pub enhancements: Vec<String>,
    /// Equipment of single-model units
    #[serde(default)]
    pub wargear: Vec<ItemCount>,
    /// Model groups of multi-model units
    #[serde(default)]
    pub models: Vec<ModelSelection>,
}

impl UnitSelection {
    pub fn new(name: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            points,
            warlord: false,
            enhancements: Vec::new(),
            wargear: Vec::new(),
            models: Vec::new(),
        }
    }

    /// Every selected weapon/wargear item, flat wargear first then per-model weapons
    pub fn selected_items(&self) -> impl Iterator<Item = &ItemCount> {
        self.wargear
            .iter()
            .chain(self.models.iter().flat_map(|m| m.weapons.iter()))
    }
}

/// The parsed army list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmySelection {
    pub name: String,
    pub points: u32,
    pub faction: String,
    pub detachment: String,
    pub characters: Vec<UnitSelection>,
    pub battleline: Vec<UnitSelection>,
    pub other_units: Vec<UnitSelection>,
}

impl ArmySelection {
    /// Append a unit to the list for `section`
    pub fn push(&mut self, section: Section, unit: UnitSelection) {
        match section {
            Section::Characters => self.characters.push(unit),
            Section::Battleline => self.battleline.push(unit),
            Section::Other => self.other_units.push(unit),
        }
    }

    /// Units of one section
    pub fn section(&self, section: Section) -> &[UnitSelection] {
        match section {
            Section::Characters => &self.characters,
            Section::Battleline => &self.battleline,
            Section::Other => &self.other_units,
        }
    }

    /// All units with the section they were listed under
    pub fn units(&self) -> impl Iterator<Item = (Section, &UnitSelection)> {
        [Section::Characters, Section::Battleline, Section::Other]
            .into_iter()
            .flat_map(move |s| self.section(s).iter().map(move |u| (s, u)))
    }

    pub fn unit_count(&self) -> usize {
        self.characters.len() + self.battleline.len() + self.other_units.len()
    }

    /// True when nothing recognisable was parsed
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.faction.is_empty() && self.unit_count() == 0
    }

    /// Render the selection back into the export format it is parsed from.
    ///
    /// Single-model units use first-level bullets for wargear; models are
    /// written with their weapons as nested bullets.
    pub fn to_list_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({} Points)", self.name, self.points);
        out.push('\n');
        if !self.faction.is_empty() {
            let _ = writeln!(out, "{}", self.faction);
        }
        if !self.detachment.is_empty() {
            let _ = writeln!(out, "{} ({} Points)", self.detachment, self.points);
        }

        for section in [Section::Characters, Section::Battleline, Section::Other] {
            let units = self.section(section);
            if units.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{section}");
            for unit in units {
                let _ = writeln!(out, "\n{} ({} Points)", unit.name, unit.points);
                if unit.warlord {
                    out.push_str("  • Warlord\n");
                }
                for enhancement in &unit.enhancements {
                    let _ = writeln!(out, "  • Enhancements: {enhancement}");
                }
                for item in &unit.wargear {
                    let _ = writeln!(out, "  • {}x {}", item.count, item.name);
                }
                for model in &unit.models {
                    let _ = writeln!(out, "  • {}x {}", model.count, model.name);
                    for weapon in &model.weapons {
                        let _ = writeln!(out, "     ◦ {}x {}", weapon.count, weapon.name);
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_units() {
        let mut army = ArmySelection::default();
        assert!(army.is_empty());

        army.push(Section::Other, UnitSelection::new("Gladiator Lancer", 160));
        army.push(Section::Characters, UnitSelection::new("Logan Grimnar", 110));

        assert_eq!(army.unit_count(), 2);
        let order: Vec<_> = army.units().map(|(s, u)| (s, u.name.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (Section::Characters, "Logan Grimnar"),
                (Section::Other, "Gladiator Lancer")
            ]
        );
    }

    #[test]
    fn test_selected_items() {
        let mut unit = UnitSelection::new("Blood Claws", 135);
        unit.wargear.push(ItemCount::new("Power fist", 1));
        let mut model = ModelSelection::new("Blood Claw", 9);
        model.weapons.push(ItemCount::new("Bolt pistol", 9));
        unit.models.push(model);

        let names: Vec<_> = unit.selected_items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Power fist", "Bolt pistol"]);
    }

    #[test]
    fn test_to_list_text_layout() {
        let mut army = ArmySelection {
            name: "Foo".to_string(),
            points: 500,
            faction: "Space Wolves".to_string(),
            ..Default::default()
        };
        let mut unit = UnitSelection::new("Bar", 100);
        unit.warlord = true;
        unit.wargear.push(ItemCount::new("Sword", 1));
        army.push(Section::Characters, unit);

        let text = army.to_list_text();
        assert!(text.starts_with("Foo (500 Points)\n"));
        assert!(text.contains("\nCHARACTERS\n"));
        assert!(text.contains("Bar (100 Points)\n  • Warlord\n  • 1x Sword\n"));
    }
}
