//! Catalogue resolver: turns a primary catalogue document plus its linked
//! documents into flat [`CatalogueUnit`] records.
//!
//! Shared definitions of every loaded document are indexed up front
//! ([`SharedIndex`]); each top-level shared selection entry is then
//! extracted by looking references up in that index. Unresolvable
//! references degrade to stubs and never fail resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::heuristics::Heuristics;
use crate::core::types::{Phase, RuleId, WeaponKind};
use crate::core::unit::{Ability, CatalogueUnit, StatBlock, WeaponProfile};
use crate::parsing::xml::{parse_document, Element};
use crate::utils::validation::{clamp_link_depth, validate_document_name, DEFAULT_LINK_DEPTH};

use super::index::SharedIndex;
use super::store::{CatalogError, ResolvedCatalogue};

/// Root element names accepted as catalogue documents
const DOCUMENT_ROOTS: [&str; 2] = ["catalogue", "gameSystem"];

/// One parsed catalogue document
#[derive(Debug, Clone)]
pub struct CatalogueDocument {
    pub name: String,
    pub revision: Option<String>,
    root: Element,
}

impl CatalogueDocument {
    /// Parse a document from XML text
    pub fn parse(xml: &str) -> Result<Self, CatalogError> {
        let root = parse_document(xml)?;
        if !DOCUMENT_ROOTS.contains(&root.name.as_str()) {
            return Err(CatalogError::NotACatalogue(root.name));
        }
        Ok(Self {
            name: root.attr_or_empty("name").to_string(),
            revision: root.attr("revision").map(str::to_string),
            root,
        })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Names of the documents this one links to, in declaration order
    pub fn linked_catalogue_names(&self) -> Vec<&str> {
        self.root
            .grandchildren("catalogueLinks", "catalogueLink")
            .filter_map(|link| link.attr("name"))
            .filter(|name| !name.trim().is_empty())
            .collect()
    }

    /// Top-level unit definitions
    pub fn shared_entries(&self) -> impl Iterator<Item = &Element> {
        self.root
            .grandchildren("sharedSelectionEntries", "selectionEntry")
    }
}

/// Resolves a primary document and its linked documents into unit records
#[derive(Debug, Clone)]
pub struct CatalogueResolver {
    primary: CatalogueDocument,
    linked: Vec<CatalogueDocument>,
    include_linked_units: bool,
    link_depth: usize,
}

impl CatalogueResolver {
    pub fn new(primary: CatalogueDocument) -> Self {
        Self {
            primary,
            linked: Vec::new(),
            include_linked_units: true,
            link_depth: DEFAULT_LINK_DEPTH,
        }
    }

    /// Load a primary document from disk.
    ///
    /// With `load_linked`, every `catalogueLink` is looked up as
    /// `<dir>/<name>.cat` next to the primary file. Linked documents that are
    /// missing or malformed are skipped with a warning; only a failure to
    /// load the primary document is returned.
    pub fn from_path(path: &Path, load_linked: bool) -> Result<Self, CatalogError> {
        let primary = CatalogueDocument::load(path)?;
        let mut resolver = Self::new(primary);
        if !load_linked {
            return Ok(resolver);
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let linked_paths: Vec<(String, PathBuf)> = resolver
            .primary
            .linked_catalogue_names()
            .into_iter()
            .filter_map(|name| match validate_document_name(name) {
                Ok(name) => Some((name.to_string(), base_dir.join(format!("{name}.cat")))),
                Err(e) => {
                    warn!(linked = %name, error = %e, "Skipping linked catalogue");
                    None
                }
            })
            .collect();

        for (name, linked_path) in linked_paths {
            if !linked_path.exists() {
                warn!(linked = %name, path = %linked_path.display(), "Linked catalogue not found");
                continue;
            }
            match CatalogueDocument::load(&linked_path) {
                Ok(document) => {
                    debug!(linked = %name, "Loaded linked catalogue");
                    resolver.add_linked(document);
                }
                Err(e) => warn!(linked = %name, error = %e, "Could not load linked catalogue"),
            }
        }

        Ok(resolver)
    }

    /// Add a linked document; later documents win identifier collisions
    pub fn add_linked(&mut self, document: CatalogueDocument) {
        self.linked.push(document);
    }

    #[must_use]
    pub fn with_linked(mut self, document: CatalogueDocument) -> Self {
        self.add_linked(document);
        self
    }

    /// Whether units defined in linked documents are emitted too
    #[must_use]
    pub fn include_linked_units(mut self, include: bool) -> Self {
        self.include_linked_units = include;
        self
    }

    /// How many entry-link hops are followed when collecting weapons
    #[must_use]
    pub fn with_link_depth(mut self, depth: usize) -> Self {
        self.link_depth = clamp_link_depth(depth);
        self
    }

    pub fn primary(&self) -> &CatalogueDocument {
        &self.primary
    }

    pub fn linked_documents(&self) -> &[CatalogueDocument] {
        &self.linked
    }

    /// Resolve all documents into flat unit records in encounter order:
    /// primary units first, then each linked document's units tagged with
    /// their source document.
    pub fn resolve(&self, heuristics: &Heuristics) -> ResolvedCatalogue {
        let index = SharedIndex::build(std::iter::once(&self.primary).chain(&self.linked));
        debug!(
            entries = index.entry_count(),
            profiles = index.profile_count(),
            documents = self.linked.len() + 1,
            "Built shared definition index"
        );

        let extractor = UnitExtractor {
            index: &index,
            heuristics,
            link_depth: self.link_depth,
        };

        let mut units: Vec<CatalogueUnit> = self
            .primary
            .shared_entries()
            .filter_map(|entry| extractor.extract(entry))
            .collect();

        if self.include_linked_units {
            for document in &self.linked {
                for entry in document.shared_entries() {
                    if let Some(mut unit) = extractor.extract(entry) {
                        unit.source_catalogue = Some(document.name.clone());
                        units.push(unit);
                    }
                }
            }
        }

        debug!(catalogue = %self.primary.name, units = units.len(), "Resolved catalogue");
        ResolvedCatalogue::new(self.primary.name.clone(), self.primary.revision.clone(), units)
    }
}

/// `(characteristic name, text)` pairs of a profile
fn characteristics(profile: &Element) -> impl Iterator<Item = (&str, &str)> {
    profile
        .descendants_named("characteristic")
        .map(|c| (c.attr_or_empty("name"), c.text.as_str()))
}

fn type_name(profile: &Element) -> &str {
    profile.attr_or_empty("typeName")
}

/// Points from the entry's own `pts` cost, else the first nested one
fn points_cost(entry: &Element) -> Option<u32> {
    let is_points = |cost: &&Element| cost.attr("name") == Some("pts");
    let cost = entry
        .grandchildren("costs", "cost")
        .find(is_points)
        .or_else(|| entry.descendants_named("cost").find(is_points))?;
    let value: f64 = cost.attr("value")?.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u32)
    } else {
        None
    }
}

/// Link name with any `append` name modifiers applied, e.g. `Feel No Pain 5+`
fn effective_link_name(link: &Element) -> String {
    let mut name = link.attr_or_empty("name").trim().to_string();
    for modifier in link.descendants_named("modifier") {
        if modifier.attr("field") != Some("name") || modifier.attr("type") != Some("append") {
            continue;
        }
        if let Some(value) = modifier.attr("value").filter(|v| !v.trim().is_empty()) {
            name = format!("{name} {}", value.trim());
        }
    }
    name.trim().to_string()
}

fn weapon_profiles(element: &Element) -> impl Iterator<Item = WeaponProfile> + '_ {
    element.descendants_named("profile").filter_map(|profile| {
        let kind = WeaponKind::from_type_name(type_name(profile))?;
        let name = profile.attr("name")?.trim();
        Some(WeaponProfile::new(name, kind).with_characteristics(characteristics(profile)))
    })
}

fn push_unique_ability(abilities: &mut Vec<Ability>, ability: Ability) {
    if !abilities.iter().any(|a| a.same_source(&ability)) {
        abilities.push(ability);
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

struct UnitExtractor<'a> {
    index: &'a SharedIndex<'a>,
    heuristics: &'a Heuristics,
    link_depth: usize,
}

impl<'a> UnitExtractor<'a> {
    fn extract(&self, entry: &'a Element) -> Option<CatalogueUnit> {
        let name = entry.attr("name")?.trim();
        if name.is_empty() {
            return None;
        }

        let mut unit = CatalogueUnit::new(name);
        unit.id = entry.attr("id").map(str::to_string);
        unit.entry_type = entry.attr("type").map(str::to_string);
        unit.points = points_cost(entry);
        self.categories(entry, &mut unit);

        unit.stats = entry
            .descendants_named("profile")
            .find(|p| type_name(p) == "Unit")
            .map(|p| StatBlock::from_characteristics(characteristics(p)));

        self.inline_abilities(entry, &mut unit.abilities);
        self.profile_links(entry, &mut unit.abilities);
        self.rule_links(entry, &mut unit.abilities);

        unit.weapons.extend(weapon_profiles(entry));
        let mut path: Vec<&str> = entry.attr("id").into_iter().collect();
        let mut seen = HashSet::new();
        self.linked_weapons(entry, 1, &mut path, &mut seen, &mut unit.weapons);

        debug!(
            unit = %unit.name,
            abilities = unit.abilities.len(),
            weapons = unit.weapons.len(),
            "Extracted unit"
        );
        Some(unit)
    }

    fn categories(&self, entry: &Element, unit: &mut CatalogueUnit) {
        let prefix = self.heuristics.faction_keyword_prefix.as_str();
        for link in entry.descendants_named("categoryLink") {
            let name = link.attr_or_empty("name").trim();
            if name.is_empty() {
                continue;
            }
            if !prefix.is_empty() && name.contains(prefix) {
                let keyword = name.replace(prefix, "");
                push_unique(&mut unit.faction_keywords, keyword.trim());
            } else {
                push_unique(&mut unit.categories, name);
            }
        }
    }

    /// Ability from a profile (description characteristic) or rule (description child)
    fn ability_from(&self, definition: &Element) -> Ability {
        let name = definition.attr_or_empty("name").trim();
        let description = definition
            .descendants_named("characteristic")
            .find(|c| c.attr("name") == Some("Description"))
            .map(|c| c.text.trim())
            .filter(|d| !d.is_empty())
            .or_else(|| definition.child_text("description"))
            .unwrap_or("");
        let phase = self.heuristics.classify_phase(name, description);
        Ability::new(name, description, phase)
    }

    fn inline_abilities(&self, entry: &Element, abilities: &mut Vec<Ability>) {
        for profile in entry.descendants_named("profile") {
            if type_name(profile) == "Abilities" {
                push_unique_ability(abilities, self.ability_from(profile));
            }
        }
    }

    fn profile_links(&self, entry: &Element, abilities: &mut Vec<Ability>) {
        for link in entry.descendants_named("infoLink") {
            if link.attr("type") != Some("profile") {
                continue;
            }
            let name = effective_link_name(link);
            let target = link.attr_or_empty("targetId");

            match self.index.profile(target) {
                Some(profile) if type_name(profile) == "Abilities" => {
                    let mut ability = self.ability_from(profile);
                    if !name.is_empty() {
                        ability.name = name;
                    }
                    push_unique_ability(abilities, ability.shared(RuleId::new(target)));
                }
                Some(_) => {
                    debug!(link = %name, target = %target, "Ignoring link to non-ability profile");
                }
                None if !name.is_empty() => {
                    debug!(link = %name, target = %target, "Unresolved profile link; keeping name only");
                    push_unique_ability(abilities, Ability::new(name, "", Phase::Any));
                }
                None => {}
            }
        }
    }

    fn rule_links(&self, entry: &Element, abilities: &mut Vec<Ability>) {
        for link in entry.descendants_named("infoLink") {
            if link.attr("type") != Some("rule") {
                continue;
            }
            let name = effective_link_name(link);
            if !name.is_empty() && self.heuristics.is_weapon_trait(&name) {
                continue;
            }
            let target = link.attr_or_empty("targetId");

            match self.index.profile(target) {
                Some(rule) => {
                    let mut ability = self.ability_from(rule);
                    if !name.is_empty() {
                        ability.name = name;
                    }
                    push_unique_ability(abilities, ability.shared(RuleId::new(target)));
                }
                None if !name.is_empty() => {
                    let description = self.heuristics.stub_description(&name);
                    push_unique_ability(abilities, Ability::new(name, description, Phase::Any));
                }
                None => {}
            }
        }
    }

    /// Weapons of shared entries reachable through entry links, up to the link depth
    fn linked_weapons(
        &self,
        element: &'a Element,
        depth: usize,
        path: &mut Vec<&'a str>,
        seen: &mut HashSet<&'a str>,
        weapons: &mut Vec<WeaponProfile>,
    ) {
        for link in element.descendants_named("entryLink") {
            let Some(target) = link.attr("targetId") else {
                continue;
            };
            if path.contains(&target) {
                warn!(target = %target, "Entry link cycle detected; not following");
                continue;
            }
            if !seen.insert(target) {
                continue;
            }
            let Some(linked) = self.index.entry(target) else {
                debug!(target = %target, "Unresolved entry link");
                continue;
            };

            weapons.extend(weapon_profiles(linked));

            if depth < self.link_depth {
                path.push(target);
                self.linked_weapons(linked, depth + 1, path, seen, weapons);
                path.pop();
            }
        }
    }
}
