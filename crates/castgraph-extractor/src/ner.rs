//! Mention extraction (alias-based NER)
//!
//! An entity is present in a text unit when any of its aliases occurs
//! as a substring of the normalized text. Word boundaries are not
//! checked, so "roy" also fires inside "destroyed"; this over-matching
//! is accepted in exchange for recall.

use std::collections::BTreeSet;
use std::sync::Arc;

use castgraph_core::EntityId;

use crate::{AliasCatalog, EntityExtractor, Mention};

/// Dictionary-driven entity extractor
#[derive(Debug, Clone)]
pub struct AliasMatcher {
    catalog: Arc<AliasCatalog>,
}

impl AliasMatcher {
    pub fn new(catalog: Arc<AliasCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AliasCatalog {
        &self.catalog
    }
}

impl Default for AliasMatcher {
    fn default() -> Self {
        Self::new(Arc::new(AliasCatalog::builtin()))
    }
}

impl EntityExtractor for AliasMatcher {
    fn extract_entities(&self, text: &str) -> BTreeSet<EntityId> {
        let normalized = crate::normalize(text);

        self.catalog
            .entries()
            .iter()
            .filter(|entry| entry.aliases.iter().any(|a| normalized.contains(a.as_str())))
            .map(|entry| entry.entity.clone())
            .collect()
    }

    fn locate_entities(&self, text: &str) -> Vec<Mention> {
        let normalized = crate::normalize(text);

        let mut mentions: Vec<Mention> = self
            .catalog
            .entries()
            .iter()
            .filter_map(|entry| {
                entry
                    .aliases
                    .iter()
                    .filter_map(|alias| {
                        normalized.find(alias.as_str()).map(|offset| (offset, alias))
                    })
                    .min_by_key(|(offset, _)| *offset)
                    .map(|(offset, alias)| Mention {
                        entity: entry.entity.clone(),
                        alias: alias.clone(),
                        offset,
                    })
            })
            .collect();

        mentions.sort_by(|a, b| a.offset.cmp(&b.offset).then_with(|| a.entity.cmp(&b.entity)));
        mentions
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(entries: Vec<(&str, Vec<&str>)>) -> AliasMatcher {
        AliasMatcher::new(Arc::new(AliasCatalog::from_entries(entries)))
    }

    fn ids(names: &[&str]) -> BTreeSet<EntityId> {
        names.iter().map(|n| EntityId::from(*n)).collect()
    }

    #[test]
    fn test_extract_case_insensitive() {
        let m = matcher(vec![("A", vec!["alice"]), ("B", vec!["barb"])]);
        assert_eq!(m.extract_entities("Alice is Barb's mother."), ids(&["A", "B"]));
    }

    #[test]
    fn test_any_alias_is_enough() {
        let m = AliasMatcher::default();
        let found = m.extract_entities("Deathstroke returns to Starling City.");
        assert_eq!(found, ids(&["Slade Wilson"]));
    }

    #[test]
    fn test_overlapping_aliases_are_inclusive() {
        let m = AliasMatcher::default();
        let found = m.extract_entities("Lance arrives at the precinct.");
        assert!(found.contains(&EntityId::from("Laurel Lance")));
        assert!(found.contains(&EntityId::from("Quentin Lance")));
    }

    #[test]
    fn test_substring_without_word_boundary() {
        let m = matcher(vec![("Roy Harper", vec!["roy"])]);
        assert_eq!(m.extract_entities("The base was destroyed."), ids(&["Roy Harper"]));
    }

    #[test]
    fn test_no_entities() {
        let m = AliasMatcher::default();
        assert!(m.extract_entities("It rained all week.").is_empty());
        assert!(m.locate_entities("").is_empty());
    }

    #[test]
    fn test_locate_orders_by_first_mention() {
        let m = matcher(vec![
            ("A", vec!["alice"]),
            ("B", vec!["barb", "barbara"]),
            ("C", vec!["carl"]),
        ]);

        let mentions = m.locate_entities("Carl met Barbara, then Alice met Carl.");
        let order: Vec<&str> = mentions.iter().map(|m| m.entity.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
        assert_eq!(mentions[0].offset, 0);
        assert_eq!(mentions[1].alias, "barb");
    }
}
