//! Parser for plain-text army list exports.
//!
//! The export has no formal grammar. Structure is recovered from indentation
//! and bullet markers in a single forward pass:
//!
//! ```text
//! Redneck Bar Fighters (2000 Points)      <- army name and points
//!
//! Space Wolves                            <- faction (first free line)
//! Strike Force (2,000 Points)             <- detachment
//!
//! CHARACTERS                              <- section header
//!
//! Logan Grimnar (110 Points)              <- unit
//!   • Warlord
//!   • 1x Axe Morkai                       <- wargear
//!
//! BATTLELINE
//!
//! Blood Claws (135 Points)
//!   • 9x Blood Claw                       <- model (has nested weapons)
//!      ◦ 9x Bolt pistol                   <- model weapon
//! ```
//!
//! Lines that match nothing are skipped; parsing never fails.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::core::army::{ArmySelection, ItemCount, ModelSelection, UnitSelection};
use crate::core::heuristics::Heuristics;
use crate::core::types::Section;

static POINTS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\((\d+)\s+[Pp]oints\)").expect("valid regex"));

static COUNT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*x\s+(.+)$").expect("valid regex"));

/// Bullet markers that always denote a nested (second-level) entry
const NESTED_BULLETS: [char; 3] = ['◦', '○', '▪'];

/// Bullet markers that denote a first-level entry unless indented deeply
const ITEM_BULLETS: [char; 4] = ['•', '-', '*', '‣'];

/// Indentation (in characters) at which any bullet counts as nested
const NESTED_INDENT: usize = 4;

/// Shape of a single line of the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    /// Not indented and not a bullet
    Unindented(&'a str),
    /// First-level bullet, marker stripped
    Item(&'a str),
    /// Second-level bullet, marker stripped
    Nested(&'a str),
    /// Indented text without a bullet
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let line = line.trim_end();
    let body = line.trim_start();
    if body.is_empty() {
        return Line::Blank;
    }
    let indent = line.chars().count() - body.chars().count();

    if let Some(marker) = body.chars().next() {
        let nested = NESTED_BULLETS.contains(&marker);
        if nested || ITEM_BULLETS.contains(&marker) {
            let text = body[marker.len_utf8()..].trim();
            return if nested || indent >= NESTED_INDENT {
                Line::Nested(text)
            } else {
                Line::Item(text)
            };
        }
    }

    if indent == 0 {
        Line::Unindented(body)
    } else {
        Line::Other
    }
}

/// Split `9x Bolt pistol` into `(9, "Bolt pistol")`
fn parse_count_prefix(text: &str) -> Option<(u32, &str)> {
    let caps = COUNT_PREFIX_RE.captures(text)?;
    let count = caps.get(1)?.as_str().parse().ok()?;
    let name = caps.get(2)?.as_str().trim();
    Some((count, name))
}

/// Split `Logan Grimnar (110 Points)` into `("Logan Grimnar", 110)`
fn parse_points_line(text: &str) -> Option<(&str, u32)> {
    let caps = POINTS_LINE_RE.captures(text)?;
    let name = caps.get(1)?.as_str().trim();
    let points = caps.get(2)?.as_str().parse().ok()?;
    Some((name, points))
}

fn enhancement_name(text: &str) -> Option<&str> {
    text.strip_prefix("Enhancements:")
        .or_else(|| text.strip_prefix("Enhancement:"))
        .map(str::trim)
}

struct ListParser<'h> {
    heuristics: &'h Heuristics,
    army: ArmySelection,
    section: Option<Section>,
    unit: Option<UnitSelection>,
    unit_seen: bool,
}

impl<'h> ListParser<'h> {
    fn new(heuristics: &'h Heuristics) -> Self {
        Self {
            heuristics,
            army: ArmySelection::default(),
            section: None,
            unit: None,
            unit_seen: false,
        }
    }

    /// Close the open unit into the current section (or other units without one)
    fn flush(&mut self) {
        if let Some(unit) = self.unit.take() {
            let section = self.section.unwrap_or(Section::Other);
            self.army.push(section, unit);
        }
    }

    fn unindented(&mut self, text: &str) {
        if self.army.name.is_empty() && self.section.is_none() && self.unit.is_none() {
            if let Some((name, points)) = parse_points_line(text) {
                self.army.name = name.to_string();
                self.army.points = points;
                return;
            }
        }

        if let Some(section) = self.heuristics.section_for_header(text) {
            self.flush();
            self.section = Some(section);
            return;
        }

        if self.heuristics.is_detachment_line(text) {
            let detachment = text.split('(').next().unwrap_or(text).trim();
            self.army.detachment = detachment.to_string();
            return;
        }

        if let Some((name, points)) = parse_points_line(text) {
            self.flush();
            self.unit = Some(UnitSelection::new(name, points));
            self.unit_seen = true;
            return;
        }

        if self.army.faction.is_empty() && !self.unit_seen {
            self.army.faction = text.to_string();
            return;
        }

        debug!(line = %text, "Skipping unrecognised line");
    }

    fn item(&mut self, text: &str, next_is_nested: bool) {
        let Some(unit) = self.unit.as_mut() else {
            debug!(line = %text, "Skipping bullet outside of a unit");
            return;
        };

        if text.eq_ignore_ascii_case("Warlord") {
            unit.warlord = true;
            return;
        }

        if let Some(enhancement) = enhancement_name(text) {
            if !enhancement.is_empty() {
                unit.enhancements.push(enhancement.to_string());
            }
            return;
        }

        let Some((count, name)) = parse_count_prefix(text) else {
            unit.wargear.push(ItemCount::new(text, 1));
            return;
        };
        if name.is_empty() {
            return;
        }

        // A following nested bullet means this entry carries weapons, so it is a model
        let is_wargear = !next_is_nested
            && (self.section == Some(Section::Characters)
                || self.heuristics.looks_like_weapon(name));

        if is_wargear {
            unit.wargear.push(ItemCount::new(name, count));
        } else {
            unit.models.push(ModelSelection::new(name, count));
        }
    }

    fn nested(&mut self, text: &str) {
        let model = self.unit.as_mut().and_then(|u| u.models.last_mut());
        let Some(model) = model else {
            debug!(line = %text, "Skipping nested bullet without an open model");
            return;
        };
        let (count, name) = parse_count_prefix(text).unwrap_or((1, text));
        if !name.is_empty() {
            model.weapons.push(ItemCount::new(name, count));
        }
    }

    fn finish(mut self) -> ArmySelection {
        self.flush();
        self.army
    }
}

/// Parse an army list export into an [`ArmySelection`].
///
/// Never fails: unrecognised lines are skipped and an input with no
/// recognisable structure yields an empty selection.
pub fn parse_army_list(text: &str, heuristics: &Heuristics) -> ArmySelection {
    let lines: Vec<Line<'_>> = text.lines().map(classify).collect();
    let mut parser = ListParser::new(heuristics);

    for (i, line) in lines.iter().enumerate() {
        match *line {
            Line::Blank | Line::Other => {}
            Line::Unindented(text) => parser.unindented(text),
            Line::Item(text) => {
                let next_is_nested = matches!(lines.get(i + 1), Some(Line::Nested(_)));
                parser.item(text, next_is_nested);
            }
            Line::Nested(text) => parser.nested(text),
        }
    }

    let army = parser.finish();
    debug!(
        army = %army.name,
        faction = %army.faction,
        units = army.unit_count(),
        "Parsed army list"
    );
    army
}
