use std::collections::{HashMap, HashSet};

use crate::core::heuristics::Heuristics;
use crate::core::sheet::EnrichedUnit;
use crate::core::types::RuleId;
use crate::core::unit::Ability;

/// Result of the faction-ability pass over all enriched units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactionAbilities {
    /// Shared rules carried by at least the threshold share of units, first-seen order
    pub promoted: Vec<Ability>,

    /// Every rule id that carried the faction marker, promoted or not.
    /// Unit-level displays of these are suppressed.
    pub flavored: HashSet<RuleId>,
}

/// Number of units a rule must appear on to be promoted
pub fn promotion_threshold(total_units: usize, ratio: f64) -> f64 {
    (total_units as f64 * ratio).max(1.0)
}

/// Find faction-wide abilities among the phase-listed and passive abilities.
///
/// A candidate is a shared rule whose description carries the faction
/// marker. Candidates are counted once per unit; a rule is promoted when its
/// unit count reaches the threshold share of all units.
pub fn extract_faction_abilities<'u>(
    units: impl IntoIterator<Item = &'u EnrichedUnit>,
    heuristics: &Heuristics,
) -> FactionAbilities {
    let mut first_seen: Vec<&Ability> = Vec::new();
    let mut counts: HashMap<&RuleId, usize> = HashMap::new();
    let mut total_units = 0;

    for unit in units {
        total_units += 1;
        let mut on_this_unit: HashSet<&RuleId> = HashSet::new();

        let passives = unit.passive_abilities.iter().map(|p| &p.ability);
        for ability in unit.abilities_by_phase.iter().chain(passives) {
            let Some(rule_id) = ability.rule_id.as_ref().filter(|_| ability.shared_rule) else {
                continue;
            };
            if !heuristics.has_faction_marker(&ability.description) {
                continue;
            }
            if !counts.contains_key(rule_id) {
                first_seen.push(ability);
            }
            if on_this_unit.insert(rule_id) {
                *counts.entry(rule_id).or_default() += 1;
            }
        }
    }

    let threshold = promotion_threshold(total_units, heuristics.faction_threshold);
    let promoted = first_seen
        .iter()
        .filter(|a| {
            a.rule_id
                .as_ref()
                .and_then(|id| counts.get(id))
                .is_some_and(|&count| count as f64 >= threshold)
        })
        .map(|a| (*a).clone())
        .collect();

    FactionAbilities {
        promoted,
        flavored: counts.into_keys().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sheet::{PassiveAbility, PhaseAbilities, WeaponSet};
    use crate::core::types::Phase;
    use proptest::prelude::*;

    const MARKED: &str = "If your Army Faction is ADEPTUS ASTARTES, you can re-roll.";

    fn unit(abilities: Vec<Ability>) -> EnrichedUnit {
        let mut by_phase = PhaseAbilities::default();
        for ability in abilities {
            by_phase.push(ability);
        }
        EnrichedUnit {
            name: "Unit".to_string(),
            points: 0,
            warlord: false,
            enhancements: Vec::new(),
            selected_wargear: Vec::new(),
            selected_models: Vec::new(),
            unit_type: None,
            matched_name: None,
            is_character: false,
            stats: None,
            abilities_by_phase: by_phase,
            passive_abilities: Vec::new(),
            weapons: WeaponSet::default(),
            categories: Vec::new(),
            faction_keywords: Vec::new(),
        }
    }

    fn shared(name: &str, id: &str, description: &str) -> Ability {
        Ability::new(name, description, Phase::Command).shared(RuleId::new(id))
    }

    #[test]
    fn test_threshold_has_floor_of_one() {
        assert!((promotion_threshold(0, 0.5) - 1.0).abs() < f64::EPSILON);
        assert!((promotion_threshold(1, 0.5) - 1.0).abs() < f64::EPSILON);
        assert!((promotion_threshold(5, 0.5) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_only_marked_shared_rules_are_candidates() {
        let units = vec![
            unit(vec![
                shared("Oath of Moment", "oath", MARKED),
                shared("Combat Doctrines", "doct", "Unmarked text"),
                Ability::new("Inline", MARKED, Phase::Any),
            ]),
            unit(vec![shared("Oath of Moment", "oath", MARKED)]),
        ];
        let result = extract_faction_abilities(&units, &Heuristics::default());

        assert_eq!(result.promoted.len(), 1);
        assert_eq!(result.promoted[0].name, "Oath of Moment");
        assert_eq!(result.flavored.len(), 1);
        assert!(result.flavored.contains(&RuleId::new("oath")));
    }

    #[test]
    fn test_below_threshold_is_flavored_but_not_promoted() {
        let units = vec![
            unit(vec![shared("Saga of the Hunter", "saga", MARKED)]),
            unit(Vec::new()),
            unit(Vec::new()),
        ];
        let result = extract_faction_abilities(&units, &Heuristics::default());
        assert!(result.promoted.is_empty());
        assert!(result.flavored.contains(&RuleId::new("saga")));
    }

    #[test]
    fn test_rule_counted_once_per_unit() {
        let units = vec![
            unit(vec![
                shared("Saga", "saga", MARKED),
                shared("Saga (again)", "saga", MARKED),
            ]),
            unit(Vec::new()),
            unit(Vec::new()),
        ];
        let result = extract_faction_abilities(&units, &Heuristics::default());
        assert!(result.promoted.is_empty());
    }

    #[test]
    fn test_passive_rules_are_candidates() {
        let oath = shared("Oath of Moment", "oath", MARKED);
        let mut with_passive = unit(Vec::new());
        with_passive.passive_abilities.push(PassiveAbility {
            ability: oath.clone(),
            badge: "Oath of Moment".to_string(),
        });
        let units = vec![with_passive, unit(vec![oath]), unit(Vec::new())];

        let result = extract_faction_abilities(&units, &Heuristics::default());
        assert_eq!(result.promoted.len(), 1);
        assert_eq!(result.promoted[0].name, "Oath of Moment");
        assert!(result.flavored.contains(&RuleId::new("oath")));
    }

    #[test]
    fn test_lowercase_marker_variant() {
        let units = vec![unit(vec![shared(
            "Oath",
            "oath",
            "if your army faction is adeptus astartes, ...",
        )])];
        let result = extract_faction_abilities(&units, &Heuristics::default());
        assert_eq!(result.promoted.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_promotion_at_half_rounded_up(n in 1usize..40) {
            let half = n.div_ceil(2);
            let build = |carrying: usize| -> Vec<EnrichedUnit> {
                (0..n)
                    .map(|i| {
                        if i < carrying {
                            unit(vec![shared("Oath of Moment", "oath", MARKED)])
                        } else {
                            unit(Vec::new())
                        }
                    })
                    .collect()
            };

            let at = extract_faction_abilities(&build(half), &Heuristics::default());
            prop_assert_eq!(at.promoted.len(), 1);

            let below = extract_faction_abilities(&build(half - 1), &Heuristics::default());
            prop_assert!(below.promoted.is_empty());
        }
    }
}
