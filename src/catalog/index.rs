use std::collections::HashMap;
use tracing::debug;

use crate::parsing::xml::Element;
use crate::utils::validation::is_valid_identifier;

use super::builder::CatalogueDocument;

/// Identifier-keyed lookup tables over the shared definitions of a document set.
///
/// Built in a single pass before any unit is extracted. Documents are added
/// primary first, then linked documents in declaration order; on identifier
/// collisions the last document added wins.
#[derive(Debug, Default)]
pub struct SharedIndex<'a> {
    /// `sharedSelectionEntries/selectionEntry` by id
    entries: HashMap<&'a str, &'a Element>,

    /// `sharedProfiles/profile` and `sharedRules/rule` by id
    profiles: HashMap<&'a str, &'a Element>,
}

impl<'a> SharedIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every document in order
    pub fn build(documents: impl IntoIterator<Item = &'a CatalogueDocument>) -> Self {
        let mut index = Self::new();
        for document in documents {
            index.add_document(document);
        }
        index
    }

    pub fn add_document(&mut self, document: &'a CatalogueDocument) {
        let root = document.root();
        let entries_before = self.entries.len();
        let profiles_before = self.profiles.len();

        for entry in root.grandchildren("sharedSelectionEntries", "selectionEntry") {
            insert_by_id(&mut self.entries, entry);
        }
        for profile in root.grandchildren("sharedProfiles", "profile") {
            insert_by_id(&mut self.profiles, profile);
        }
        for rule in root.grandchildren("sharedRules", "rule") {
            insert_by_id(&mut self.profiles, rule);
        }

        debug!(
            document = %document.name,
            new_entries = self.entries.len() - entries_before,
            new_profiles = self.profiles.len() - profiles_before,
            "Indexed shared definitions"
        );
    }

    /// Shared selection entry by id
    pub fn entry(&self, id: &str) -> Option<&'a Element> {
        self.entries.get(id).copied()
    }

    /// Shared profile or rule by id
    pub fn profile(&self, id: &str) -> Option<&'a Element> {
        self.profiles.get(id).copied()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

fn insert_by_id<'a>(map: &mut HashMap<&'a str, &'a Element>, element: &'a Element) {
    if let Some(id) = element.attr("id").filter(|id| is_valid_identifier(id)) {
        map.insert(id, element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(xml: &str) -> CatalogueDocument {
        CatalogueDocument::parse(xml).unwrap()
    }

    #[test]
    fn test_indexes_entries_profiles_and_rules() {
        let doc = document(
            r#"<catalogue name="A">
                <sharedSelectionEntries>
                    <selectionEntry id="e1" name="Blood Claws"/>
                </sharedSelectionEntries>
                <sharedProfiles>
                    <profile id="p1" name="Berserk Charge" typeName="Abilities"/>
                </sharedProfiles>
                <sharedRules>
                    <rule id="r1" name="Deep Strike"/>
                    <rule id="" name="No id"/>
                </sharedRules>
            </catalogue>"#,
        );
        let index = SharedIndex::build([&doc]);

        assert_eq!(index.entry_count(), 1);
        assert_eq!(index.profile_count(), 2);
        assert_eq!(index.entry("e1").and_then(|e| e.attr("name")), Some("Blood Claws"));
        assert_eq!(index.profile("r1").and_then(|e| e.attr("name")), Some("Deep Strike"));
        assert!(index.profile("missing").is_none());
    }

    #[test]
    fn test_last_document_wins_on_collision() {
        let primary = document(
            r#"<catalogue name="A"><sharedRules><rule id="r1" name="Primary"/></sharedRules></catalogue>"#,
        );
        let linked = document(
            r#"<catalogue name="B"><sharedRules><rule id="r1" name="Linked"/></sharedRules></catalogue>"#,
        );
        let index = SharedIndex::build([&primary, &linked]);
        assert_eq!(index.profile("r1").and_then(|e| e.attr("name")), Some("Linked"));
    }
}
