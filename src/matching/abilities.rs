//! Passive/active ability classification and badge text.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::heuristics::Heuristics;
use crate::core::sheet::{PassiveAbility, PhaseAbilities};
use crate::core::unit::Ability;
use crate::utils::text::clean_markup;

static INVULNERABLE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d\+)\s+invulnerable save").expect("valid regex"));

static INCH_DISTANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d+)""#).expect("valid regex"));

const SCOUT_MARKER: &str = "Scout";

/// Keyword-style abilities shown as badges instead of full text
pub fn is_passive(ability: &Ability, heuristics: &Heuristics) -> bool {
    heuristics
        .passive_keywords
        .iter()
        .any(|k| ability.name.contains(k.as_str()))
        || ability
            .name
            .contains(heuristics.invulnerable_save_marker.as_str())
        || heuristics.is_stub_description(&ability.description)
}

/// Short badge text, e.g. `Invulnerable Save 4+` or `Scout 6"`; otherwise the name
pub fn passive_badge(ability: &Ability, heuristics: &Heuristics) -> String {
    let marker = heuristics.invulnerable_save_marker.as_str();
    let description = ability.description.trim();

    if ability.name.contains(marker) {
        if description.ends_with('+') {
            return format!("{marker} {description}");
        }
        if let Some(caps) = INVULNERABLE_VALUE_RE.captures(description) {
            return format!("{marker} {}", &caps[1]);
        }
        return ability.name.clone();
    }

    if ability.name.contains(SCOUT_MARKER) {
        if let Some(caps) = INCH_DISTANCE_RE.captures(description) {
            return format!("{SCOUT_MARKER} {}\"", &caps[1]);
        }
    }

    ability.name.clone()
}

/// Split catalogue abilities into per-phase lists and passive badges.
/// Displayed descriptions have catalogue markup converted.
pub fn partition_abilities(
    abilities: &[Ability],
    heuristics: &Heuristics,
) -> (PhaseAbilities, Vec<PassiveAbility>) {
    let mut by_phase = PhaseAbilities::default();
    let mut passive = Vec::new();

    for ability in abilities {
        let mut ability = ability.clone();
        ability.description = clean_markup(&ability.description);

        if is_passive(&ability, heuristics) {
            let badge = passive_badge(&ability, heuristics);
            passive.push(PassiveAbility { ability, badge });
        } else {
            by_phase.push(ability);
        }
    }

    (by_phase, passive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Phase;

    fn ability(name: &str, description: &str) -> Ability {
        Ability::new(name, description, Phase::Any)
    }

    #[test]
    fn test_is_passive() {
        let h = Heuristics::default();
        assert!(is_passive(&ability("Deep Strike", "long rules text"), &h));
        assert!(is_passive(&ability("Feel No Pain 5+", ""), &h));
        assert!(is_passive(&ability("Invulnerable Save", "4+"), &h));
        assert!(is_passive(
            &ability("Wolf Kin", "The bearer has the Wolf Kin ability."),
            &h
        ));
        assert!(!is_passive(
            &ability("Berserk Charge", "Add 1 to Charge rolls."),
            &h
        ));
    }

    #[test]
    fn test_stub_classified_passive() {
        let h = Heuristics::default();
        let stub = ability("Deep Strike", &h.stub_description("Deep Strike"));
        assert!(is_passive(&stub, &h));
        assert_eq!(passive_badge(&stub, &h), "Deep Strike");
    }

    #[test]
    fn test_invulnerable_badge() {
        let h = Heuristics::default();
        assert_eq!(
            passive_badge(&ability("Invulnerable Save", " 4+ "), &h),
            "Invulnerable Save 4+"
        );
        assert_eq!(
            passive_badge(
                &ability("Invulnerable Save", "This model has a 5+ invulnerable save."),
                &h
            ),
            "Invulnerable Save 5+"
        );
        assert_eq!(
            passive_badge(&ability("Invulnerable Save", "See datasheet."), &h),
            "Invulnerable Save"
        );
    }

    #[test]
    fn test_scout_badge() {
        let h = Heuristics::default();
        assert_eq!(
            passive_badge(&ability("Scout", "This unit has Scout 6\"."), &h),
            "Scout 6\""
        );
        assert_eq!(passive_badge(&ability("Scout", ""), &h), "Scout");
    }

    #[test]
    fn test_partition_cleans_markup() {
        let h = Heuristics::default();
        let abilities = vec![
            Ability::new("Berserk Charge", "Add 1 to ^^**Charge^^** rolls.", Phase::Charge),
            ability("Stealth", "^^Infantry^^ only"),
        ];
        let (by_phase, passive) = partition_abilities(&abilities, &h);

        assert_eq!(by_phase.get(Phase::Charge).len(), 1);
        assert_eq!(
            by_phase.get(Phase::Charge)[0].description,
            "Add 1 to **Charge** rolls."
        );
        assert_eq!(passive.len(), 1);
        assert_eq!(passive[0].badge, "Stealth");
        assert_eq!(passive[0].ability.description, "Infantry only");
    }
}
