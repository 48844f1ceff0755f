use serde::{Deserialize, Serialize};

use crate::core::types::{Phase, RuleId, WeaponKind};

/// The six-characteristic stat line of a unit. Values are opaque display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(rename = "M", default)]
    pub movement: String,
    #[serde(rename = "T", default)]
    pub toughness: String,
    #[serde(rename = "SV", default)]
    pub save: String,
    #[serde(rename = "W", default)]
    pub wounds: String,
    #[serde(rename = "LD", default)]
    pub leadership: String,
    #[serde(rename = "OC", default)]
    pub objective_control: String,
}

impl StatBlock {
    /// Build a stat block from `(characteristic name, value)` pairs.
    /// Unknown characteristic names are ignored.
    pub fn from_characteristics<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut stats = Self::default();
        for (name, value) in pairs {
            let value = value.trim().to_string();
            match name.trim().to_ascii_uppercase().as_str() {
                "M" | "MOVE" => stats.movement = value,
                "T" | "TOUGHNESS" => stats.toughness = value,
                "SV" | "SAVE" => stats.save = value,
                "W" | "WOUNDS" => stats.wounds = value,
                "LD" | "LEADERSHIP" => stats.leadership = value,
                "OC" | "OBJECTIVECONTROL" | "OBJECTIVE CONTROL" => stats.objective_control = value,
                _ => {}
            }
        }
        stats
    }
}

/// A unit ability, either defined inline or resolved from a shared rule/profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub phase: Phase,

    /// True when resolved through a link to a shared rule or profile
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared_rule: bool,

    /// Identifier of the shared definition; only set for shared rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<RuleId>,
}

impl Ability {
    pub fn new(name: impl Into<String>, description: impl Into<String>, phase: Phase) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            phase,
            shared_rule: false,
            rule_id: None,
        }
    }

    #[must_use]
    pub fn shared(mut self, rule_id: RuleId) -> Self {
        self.shared_rule = true;
        self.rule_id = Some(rule_id);
        self
    }

    /// Same name from the same source; an inline ability never equals a shared rule
    pub fn same_source(&self, other: &Ability) -> bool {
        self.name == other.name && self.rule_id == other.rule_id
    }
}

/// A weapon profile. Two profiles are the same weapon only if every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub kind: WeaponKind,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub attacks: String,
    /// Ballistic skill for ranged weapons, weapon skill for melee weapons
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub armour_penetration: String,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub keywords: String,
}

impl WeaponProfile {
    pub fn new(name: impl Into<String>, kind: WeaponKind) -> Self {
        Self {
            name: name.into(),
            kind,
            range: String::new(),
            attacks: String::new(),
            skill: String::new(),
            strength: String::new(),
            armour_penetration: String::new(),
            damage: String::new(),
            keywords: String::new(),
        }
    }

    /// Fill characteristics from `(name, value)` pairs as found in a catalogue profile
    #[must_use]
    pub fn with_characteristics<'a>(
        mut self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let skill_name = self.kind.skill_characteristic();
        for (name, value) in pairs {
            let value = value.trim().to_string();
            match name.trim() {
                "Range" => self.range = value,
                "A" => self.attacks = value,
                "S" => self.strength = value,
                "AP" => self.armour_penetration = value,
                "D" => self.damage = value,
                "Keywords" => self.keywords = value,
                n if n == skill_name => self.skill = value,
                _ => {}
            }
        }
        self
    }
}

/// A flat unit record resolved from a catalogue document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueUnit {
    /// Join key against army list selections
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,

    /// Listed points cost, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub faction_keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatBlock>,

    #[serde(default)]
    pub abilities: Vec<Ability>,

    #[serde(default)]
    pub weapons: Vec<WeaponProfile>,

    /// Linked document this record was parsed from, if not the primary one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_catalogue: Option<String>,
}

impl CatalogueUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            entry_type: None,
            points: None,
            categories: Vec::new(),
            faction_keywords: Vec::new(),
            stats: None,
            abilities: Vec::new(),
            weapons: Vec::new(),
            source_catalogue: None,
        }
    }

    /// Character units are never aggregated weapon-wise
    pub fn is_character(&self) -> bool {
        self.categories
            .iter()
            .any(|c| c == "Character" || c == "Epic Hero")
    }

    /// Merge a duplicate fragment of the same unit into this one.
    ///
    /// Stats are taken from the first fragment that has them, abilities are
    /// unioned by name (first occurrence wins), weapons by full profile
    /// equality, and categories/faction keywords by value.
    pub fn merge_from(&mut self, other: &CatalogueUnit) {
        if self.stats.is_none() {
            self.stats.clone_from(&other.stats);
        }
        if self.points.is_none() {
            self.points = other.points;
        }

        for ability in &other.abilities {
            if !self.abilities.iter().any(|a| a.same_source(ability)) {
                self.abilities.push(ability.clone());
            }
        }

        for weapon in &other.weapons {
            if !self.weapons.contains(weapon) {
                self.weapons.push(weapon.clone());
            }
        }

        for category in &other.categories {
            if !self.categories.contains(category) {
                self.categories.push(category.clone());
            }
        }

        for keyword in &other.faction_keywords {
            if !self.faction_keywords.contains(keyword) {
                self.faction_keywords.push(keyword.clone());
            }
        }
    }
}
