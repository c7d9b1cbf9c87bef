//! Alias Catalog
//!
//! Static mapping from a canonical entity to the surface forms that
//! identify it in text. Alias sets may overlap between entities
//! ("lance" names both Laurel and Quentin); the catalog does not try to
//! disambiguate.

use std::collections::BTreeMap;

use castgraph_core::presets::DEFAULT_CAST;
use castgraph_core::EntityId;

/// Dictionary entry for entity matching
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub entity: EntityId,
    /// Normalized aliases, in insertion order, without duplicates
    pub aliases: Vec<String>,
}

/// Canonical entity -> aliases lookup
#[derive(Debug, Clone, Default)]
pub struct AliasCatalog {
    entries: Vec<CatalogEntry>,
}

impl AliasCatalog {
    /// Build a catalog from (entity, aliases) entries.
    ///
    /// Aliases are lowercased and trimmed; empty aliases are dropped since
    /// they would match every text unit. Repeated entities are merged.
    pub fn from_entries<I, N, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: Into<EntityId>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let mut catalog = Self::default();
        for (entity, aliases) in entries {
            catalog.add_entity(entity.into(), aliases);
        }
        catalog
    }

    /// The built-in ARROW cast
    pub fn builtin() -> Self {
        Self::from_entries(DEFAULT_CAST.iter().map(|(name, aliases)| (*name, aliases.iter())))
    }

    /// Build from a configuration table
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Self {
        Self::from_entries(table.iter().map(|(name, aliases)| (name.as_str(), aliases.iter())))
    }

    fn add_entity<A>(&mut self, entity: EntityId, aliases: A)
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let index = match self.entries.iter().position(|e| e.entity == entity) {
            Some(index) => index,
            None => {
                self.entries.push(CatalogEntry {
                    entity,
                    aliases: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        for alias in aliases {
            let alias = crate::normalize(alias.as_ref().trim());
            if !alias.is_empty() && !entry.aliases.contains(&alias) {
                entry.aliases.push(alias);
            }
        }
    }

    /// Aliases registered for `entity`
    pub fn aliases_of(&self, entity: &EntityId) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| &e.entity == entity)
            .map(|e| e.aliases.as_slice())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        self.entries.iter().any(|e| &e.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = AliasCatalog::builtin();
        assert_eq!(catalog.len(), 15);

        let aliases = catalog.aliases_of(&EntityId::from("Slade Wilson")).unwrap();
        assert!(aliases.contains(&"deathstroke".to_string()));
    }

    #[test]
    fn test_aliases_are_normalized() {
        let catalog = AliasCatalog::from_entries([("Alice", vec!["  Alice ", "ALICE", "", "Al"])]);
        let aliases = catalog.aliases_of(&EntityId::from("Alice")).unwrap();
        assert_eq!(aliases, ["alice", "al"]);
    }

    #[test]
    fn test_repeated_entity_is_merged() {
        let catalog = AliasCatalog::from_entries([
            ("Barb", vec!["barb"]),
            ("Barb", vec!["barbara", "barb"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.aliases_of(&EntityId::from("Barb")).unwrap(),
            ["barb", "barbara"]
        );
    }

    #[test]
    fn test_unknown_entity() {
        let catalog = AliasCatalog::builtin();
        assert!(catalog.aliases_of(&EntityId::from("Barry Allen")).is_none());
        assert!(!catalog.contains(&EntityId::from("Barry Allen")));
    }
}
