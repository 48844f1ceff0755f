use serde::{Deserialize, Serialize};

/// Stable identifier of a shared rule or profile in a catalogue document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game phase an ability is most relevant to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Command,
    Movement,
    Shooting,
    Charge,
    Fight,
    Any,
}

impl Phase {
    /// All phases in display order
    pub const ALL: [Phase; 6] = [
        Phase::Command,
        Phase::Movement,
        Phase::Shooting,
        Phase::Charge,
        Phase::Fight,
        Phase::Any,
    ];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Movement => write!(f, "Movement"),
            Self::Shooting => write!(f, "Shooting"),
            Self::Charge => write!(f, "Charge"),
            Self::Fight => write!(f, "Fight"),
            Self::Any => write!(f, "Any"),
        }
    }
}

/// Weapon kind, which also decides whether the skill characteristic is BS or WS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Ranged,
    Melee,
}

impl WeaponKind {
    /// Map a catalogue profile type name to a weapon kind
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "Ranged Weapons" => Some(Self::Ranged),
            "Melee Weapons" => Some(Self::Melee),
            _ => None,
        }
    }

    /// Characteristic name holding the hit skill for this kind
    pub fn skill_characteristic(self) -> &'static str {
        match self {
            Self::Ranged => "BS",
            Self::Melee => "WS",
        }
    }
}

/// Army list section a unit selection was listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Characters,
    Battleline,
    #[serde(rename = "other_units")]
    Other,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Characters => write!(f, "CHARACTERS"),
            Self::Battleline => write!(f, "BATTLELINE"),
            Self::Other => write!(f, "OTHER DATASHEETS"),
        }
    }
}

/// Display grouping for non-character units on the finished sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitType {
    Battleline,
    Other,
}

impl UnitType {
    #[must_use]
    pub fn from_section(section: Section) -> Option<Self> {
        match section {
            Section::Characters => None,
            Section::Battleline => Some(Self::Battleline),
            Section::Other => Some(Self::Other),
        }
    }
}
