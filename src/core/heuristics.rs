//! Keyword tables driving the text-classification heuristics.
//!
//! Every list the army list parser, catalogue resolver, and reconciliation
//! engine consult lives here as data, so a faction with unusual naming can be
//! supported by supplying a JSON file rather than by touching control flow.
//! Missing fields in a user file fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::types::{Phase, Section};

#[derive(Error, Debug)]
pub enum HeuristicsError {
    #[error("Failed to read heuristics file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse heuristics file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unindented army list line that switches the current section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub header: String,
    pub section: Section,
}

/// Substrings that place an ability in a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseKeywords {
    pub phase: Phase,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Exact header lines and the section each opens
    pub section_headers: Vec<SectionHeader>,

    /// Substrings identifying the detachment line
    pub detachment_markers: Vec<String>,

    /// Lowercase substrings of model names; these veto `weapon_keywords`
    pub model_keywords: Vec<String>,

    /// Lowercase substrings of weapon/wargear names
    pub weapon_keywords: Vec<String>,

    /// Rule links whose name contains one of these are weapon traits, not abilities
    pub weapon_trait_keywords: Vec<String>,

    /// Checked in order; the first phase with a matching keyword wins
    /// Abilities matching none of these (auras included) apply in any phase
    pub phase_keywords: Vec<PhaseKeywords>,

    /// Ability names containing one of these are shown as badges
    pub passive_keywords: Vec<String>,

    pub invulnerable_save_marker: String,

    /// Prefix of the description synthesized for unresolved rule links
    pub stub_description_marker: String,

    /// Stub-like descriptions at least this long are not treated as passive
    pub stub_description_max_len: usize,

    /// Category link prefix that marks a faction keyword
    pub faction_keyword_prefix: String,

    /// Phrase marking an ability as faction-flavored
    pub faction_marker: String,

    /// Share of all units that must carry a faction-flavored rule to promote it
    pub faction_threshold: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            section_headers: vec![
                SectionHeader {
                    header: "CHARACTERS".to_string(),
                    section: Section::Characters,
                },
                SectionHeader {
                    header: "BATTLELINE".to_string(),
                    section: Section::Battleline,
                },
                SectionHeader {
                    header: "DEDICATED TRANSPORTS".to_string(),
                    section: Section::Other,
                },
                SectionHeader {
                    header: "OTHER DATASHEETS".to_string(),
                    section: Section::Other,
                },
                SectionHeader {
                    header: "OTHER UNITS".to_string(),
                    section: Section::Other,
                },
            ],
            detachment_markers: strings(&["Strike Force", "Combat Patrol"]),
            model_keywords: strings(&[
                "pack leader",
                "pack member",
                "sergeant",
                "squad",
                "trooper",
                "warrior",
                "marine",
                "guard",
                "terminator",
                "veteran",
                "scout",
                "intercessor",
                "assault",
                "tactical",
                "devastator",
                "reiver",
                "bladeguard",
                "hellblaster",
                "primaris",
                "blood claw",
                "grey hunter",
                "long fang",
                "wolf guard",
                "sky claw",
                "swift claw",
                "thunderwolf",
                "cavalry",
                "biker",
                "jump pack",
            ]),
            weapon_keywords: strings(&[
                "pistol",
                "bolter",
                "gun",
                "rifle",
                "cannon",
                "launcher",
                "blade",
                "sword",
                "axe",
                "hammer",
                "fist",
                "staff",
                "melta",
                "plasma",
                "flamer",
                "missile",
                "grenade",
                "chain",
                "power",
                "force",
                "storm",
                "lightning",
                "thunder",
                "morkai",
                "fenrir",
                "foehammer",
                "shield",
                "weapon",
                "armour",
                "hull",
                "teeth",
                "laser",
                "lascannon",
                "destroyer",
                "pod",
                "stubber",
                "autocannon",
            ]),
            weapon_trait_keywords: strings(&[
                "Rapid Fire",
                "Assault",
                "Heavy",
                "Pistol",
                "Twin-linked",
                "Devastating Wounds",
                "Lethal Hits",
                "Sustained Hits",
                "Anti-",
                "Melta",
                "Blast",
                "Torrent",
                "Hazardous",
                "Indirect Fire",
                "Lance",
                "One Shot",
                "Precision",
                "Psychic",
                "Ignores Cover",
            ]),
            phase_keywords: vec![
                PhaseKeywords {
                    phase: Phase::Command,
                    keywords: strings(&["command phase", "cp", "stratagem", "battle-shock"]),
                },
                PhaseKeywords {
                    phase: Phase::Movement,
                    keywords: strings(&[
                        "movement phase",
                        "advance",
                        "fall back",
                        "deep strike",
                        "reserves",
                        "redeploy",
                        "move",
                        "charge",
                    ]),
                },
                PhaseKeywords {
                    phase: Phase::Shooting,
                    keywords: strings(&[
                        "shooting phase",
                        "ranged attack",
                        "shoot",
                        "ranged weapon",
                        "ballistic skill",
                        "bs",
                    ]),
                },
                PhaseKeywords {
                    phase: Phase::Fight,
                    keywords: strings(&[
                        "fight phase",
                        "melee",
                        "close combat",
                        "fight",
                        "weapon skill",
                        "ws",
                        "charge",
                    ]),
                },
            ],
            passive_keywords: strings(&[
                "Deep Strike",
                "Leader",
                "Scout",
                "Stealth",
                "Infiltrators",
                "Oath of Moment",
                "Extra Attacks",
                "Fights First",
                "Lone Operative",
                "Feel No Pain",
                "Deadly Demise",
                "Firing Deck",
                "Hover",
                "Anti-",
                "Sustained Hits",
                "Devastating Wounds",
                "Lethal Hits",
            ]),
            invulnerable_save_marker: "Invulnerable Save".to_string(),
            stub_description_marker: "The bearer has the".to_string(),
            stub_description_max_len: 100,
            faction_keyword_prefix: "Faction:".to_string(),
            faction_marker: "If your Army Faction is".to_string(),
            faction_threshold: 0.5,
        }
    }
}

impl Heuristics {
    /// Load heuristics from a JSON file; absent fields keep their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, HeuristicsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, HeuristicsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Section opened by an exact header line
    pub fn section_for_header(&self, line: &str) -> Option<Section> {
        self.section_headers
            .iter()
            .find(|h| h.header == line)
            .map(|h| h.section)
    }

    pub fn is_detachment_line(&self, line: &str) -> bool {
        self.detachment_markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// True if `name` reads like a weapon rather than a model.
    /// Model keywords take precedence.
    pub fn looks_like_weapon(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if self.model_keywords.iter().any(|k| lower.contains(k.as_str())) {
            return false;
        }
        self.weapon_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    pub fn is_weapon_trait(&self, name: &str) -> bool {
        self.weapon_trait_keywords
            .iter()
            .any(|k| name.contains(k.as_str()))
    }

    /// Phase of an ability from a case-insensitive keyword scan of its name and description
    pub fn classify_phase(&self, name: &str, description: &str) -> Phase {
        let text = format!("{name} {description}").to_lowercase();
        for entry in &self.phase_keywords {
            if entry.keywords.iter().any(|k| text.contains(k.as_str())) {
                return entry.phase;
            }
        }
        Phase::Any
    }

    /// Description given to a rule link whose target is not loaded
    pub fn stub_description(&self, name: &str) -> String {
        format!("{} {name} ability.", self.stub_description_marker)
    }

    pub fn is_stub_description(&self, description: &str) -> bool {
        description.contains(self.stub_description_marker.as_str())
            && description.chars().count() < self.stub_description_max_len
    }

    pub fn has_faction_marker(&self, description: &str) -> bool {
        description.contains(self.faction_marker.as_str())
            || description
                .to_lowercase()
                .contains(&self.faction_marker.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_for_header() {
        let h = Heuristics::default();
        assert_eq!(h.section_for_header("CHARACTERS"), Some(Section::Characters));
        assert_eq!(h.section_for_header("OTHER UNITS"), Some(Section::Other));
        assert_eq!(
            h.section_for_header("DEDICATED TRANSPORTS"),
            Some(Section::Other)
        );
        assert_eq!(h.section_for_header("Characters"), None);
    }

    #[test]
    fn test_looks_like_weapon() {
        let h = Heuristics::default();
        assert!(h.looks_like_weapon("Bolt pistol"));
        assert!(h.looks_like_weapon("Armoured hull"));
        assert!(h.looks_like_weapon("Sword"));
        // Model keywords veto weapon keywords
        assert!(!h.looks_like_weapon("Blood Claw Pack Leader"));
        assert!(!h.looks_like_weapon("Assault Intercessor with power fist"));
        assert!(!h.looks_like_weapon("Blood Claw"));
    }

    #[test]
    fn test_classify_phase_priority() {
        let h = Heuristics::default();
        assert_eq!(
            h.classify_phase("Oath", "Once per battle, in your Command phase"),
            Phase::Command
        );
        assert_eq!(
            h.classify_phase("Swift", "This unit can Advance and shoot"),
            Phase::Movement
        );
        assert_eq!(
            h.classify_phase("Marksman", "Re-roll ranged attack hit rolls"),
            Phase::Shooting
        );
        assert_eq!(
            h.classify_phase("Rage", "Add 1 to melee Attacks"),
            Phase::Fight
        );
        assert_eq!(h.classify_phase("Terror", "Aura: enemy units nearby"), Phase::Any);
        assert_eq!(h.classify_phase("Tough", "Worsen damage by 1"), Phase::Any);
    }

    #[test]
    fn test_stub_description() {
        let h = Heuristics::default();
        let stub = h.stub_description("Deep Strike");
        assert_eq!(stub, "The bearer has the Deep Strike ability.");
        assert!(h.is_stub_description(&stub));
        assert!(!h.is_stub_description(&format!("{stub} {}", "x".repeat(100))));
    }

    #[test]
    fn test_stub_length_counts_characters() {
        let h = Heuristics::default();
        // 68 characters but 108 bytes
        let stub = h.stub_description(&"é".repeat(40));
        assert!(stub.len() >= h.stub_description_max_len);
        assert!(h.is_stub_description(&stub));
    }

    #[test]
    fn test_faction_marker_is_case_insensitive() {
        let h = Heuristics::default();
        assert!(h.has_faction_marker("If your Army Faction is SPACE WOLVES, ..."));
        assert!(h.has_faction_marker("if your army faction is space wolves, ..."));
        assert!(!h.has_faction_marker("Each time this model makes an attack"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let h = Heuristics::from_json(r#"{"faction_threshold": 0.75}"#).unwrap();
        assert!((h.faction_threshold - 0.75).abs() < f64::EPSILON);
        assert_eq!(h.detachment_markers, vec!["Strike Force", "Combat Patrol"]);
    }
}
