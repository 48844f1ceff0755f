use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::army::{ItemCount, ModelSelection};
use crate::core::types::{Phase, RuleId, UnitType};
use crate::core::unit::{Ability, StatBlock, WeaponProfile};

/// Non-passive abilities grouped by phase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAbilities {
    #[serde(rename = "Command", default)]
    pub command: Vec<Ability>,
    #[serde(rename = "Movement", default)]
    pub movement: Vec<Ability>,
    #[serde(rename = "Shooting", default)]
    pub shooting: Vec<Ability>,
    #[serde(rename = "Charge", default)]
    pub charge: Vec<Ability>,
    #[serde(rename = "Fight", default)]
    pub fight: Vec<Ability>,
    #[serde(rename = "Any", default)]
    pub any: Vec<Ability>,
}

impl PhaseAbilities {
    pub fn get(&self, phase: Phase) -> &[Ability] {
        match phase {
            Phase::Command => &self.command,
            Phase::Movement => &self.movement,
            Phase::Shooting => &self.shooting,
            Phase::Charge => &self.charge,
            Phase::Fight => &self.fight,
            Phase::Any => &self.any,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> &mut Vec<Ability> {
        match phase {
            Phase::Command => &mut self.command,
            Phase::Movement => &mut self.movement,
            Phase::Shooting => &mut self.shooting,
            Phase::Charge => &mut self.charge,
            Phase::Fight => &mut self.fight,
            Phase::Any => &mut self.any,
        }
    }

    /// File an ability under its own phase
    pub fn push(&mut self, ability: Ability) {
        self.get_mut(ability.phase).push(ability);
    }

    /// All abilities in phase display order
    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        Phase::ALL.into_iter().flat_map(move |p| self.get(p).iter())
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Ability) -> bool) {
        for phase in Phase::ALL {
            self.get_mut(phase).retain(|a| keep(a));
        }
    }

    pub fn len(&self) -> usize {
        Phase::ALL.iter().map(|p| self.get(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A passive ability shown as a compact badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveAbility {
    #[serde(flatten)]
    pub ability: Ability,
    /// Short display text, e.g. `Invulnerable Save 4+` or `Scout 6"`
    pub badge: String,
}

/// One weapon row of the sheet with the number of copies carried
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRow {
    pub name: String,
    pub range: String,
    pub attacks: String,
    pub skill: String,
    pub strength: String,
    pub ap: String,
    pub damage: String,
    pub keywords: String,
    pub count: u32,
}

impl WeaponRow {
    pub fn from_profile(profile: &WeaponProfile, count: u32) -> Self {
        Self {
            name: profile.name.clone(),
            range: profile.range.clone(),
            attacks: profile.attacks.clone(),
            skill: profile.skill.clone(),
            strength: profile.strength.clone(),
            ap: profile.armour_penetration.clone(),
            damage: profile.damage.clone(),
            keywords: profile.keywords.clone(),
            count,
        }
    }

    /// Everything displayed except the count
    pub fn display_key(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.range.as_str(),
            self.attacks.as_str(),
            self.skill.as_str(),
            self.strength.as_str(),
            self.ap.as_str(),
            self.damage.as_str(),
            self.keywords.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSet {
    pub ranged: Vec<WeaponRow>,
    pub melee: Vec<WeaponRow>,
}

impl WeaponSet {
    pub fn is_empty(&self) -> bool {
        self.ranged.is_empty() && self.melee.is_empty()
    }
}

/// A unit selection joined with its catalogue record, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedUnit {
    pub name: String,
    pub points: u32,
    pub warlord: bool,
    pub enhancements: Vec<String>,
    pub selected_wargear: Vec<ItemCount>,
    pub selected_models: Vec<ModelSelection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitType>,

    /// Catalogue record the selection was matched to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_name: Option<String>,

    pub is_character: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatBlock>,

    pub abilities_by_phase: PhaseAbilities,
    pub passive_abilities: Vec<PassiveAbility>,
    pub weapons: WeaponSet,
    pub categories: Vec<String>,
    pub faction_keywords: Vec<String>,
}

impl EnrichedUnit {
    /// Drop every displayed ability whose shared rule id is in `rule_ids`
    #[must_use]
    pub fn without_rules(mut self, rule_ids: &HashSet<RuleId>) -> Self {
        let keep = |a: &Ability| a.rule_id.as_ref().map_or(true, |id| !rule_ids.contains(id));
        self.abilities_by_phase.retain(&keep);
        self.passive_abilities.retain(|p| keep(&p.ability));
        self
    }
}

/// The finished reference sheet handed to renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheatSheet {
    pub army_name: String,
    pub points: u32,
    pub faction: String,
    pub detachment: String,
    /// Warlord first, then the remaining characters in list order
    pub characters: Vec<EnrichedUnit>,
    /// Battleline units followed by all other units
    pub units: Vec<EnrichedUnit>,
    /// Abilities shared by at least the threshold share of all units
    pub faction_abilities: Vec<Ability>,
}

impl CheatSheet {
    pub fn all_units(&self) -> impl Iterator<Item = &EnrichedUnit> {
        self.characters.iter().chain(self.units.iter())
    }

    pub fn unit_count(&self) -> usize {
        self.characters.len() + self.units.len()
    }
}
