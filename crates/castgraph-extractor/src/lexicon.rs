//! Relation Lexicon
//!
//! Static mapping from relation type to the indicator phrases that
//! signal it. Indicator sets may overlap across types.

use std::collections::BTreeMap;

use castgraph_core::presets::DEFAULT_LEXICON;
use castgraph_core::{RelationType, Result};

/// Relation type -> indicator phrases lookup
#[derive(Debug, Clone, Default)]
pub struct RelationLexicon {
    entries: Vec<(RelationType, Vec<String>)>,
}

impl RelationLexicon {
    /// Build a lexicon from (type, indicators) entries.
    ///
    /// Indicators are normalized the same way as text units. A type left
    /// with no indicators is not registered.
    pub fn from_entries<I, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (RelationType, A)>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let mut lexicon = Self::default();
        for (relation, indicators) in entries {
            lexicon.add_indicators(relation, indicators);
        }
        lexicon.entries.retain(|(relation, indicators)| {
            if indicators.is_empty() {
                tracing::warn!("Relation type {} has no indicators; ignoring it", relation);
            }
            !indicators.is_empty()
        });
        lexicon
    }

    /// The built-in relationship vocabulary
    pub fn builtin() -> Self {
        Self::from_entries(
            DEFAULT_LEXICON
                .iter()
                .map(|(relation, indicators)| (*relation, indicators.iter())),
        )
    }

    /// Build from a configuration table keyed by relation type name
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let entries = table
            .iter()
            .map(|(name, indicators)| Ok((name.parse::<RelationType>()?, indicators.iter())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(entries))
    }

    fn add_indicators<A>(&mut self, relation: RelationType, indicators: A)
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let index = match self.entries.iter().position(|(r, _)| *r == relation) {
            Some(index) => index,
            None => {
                self.entries.push((relation, Vec::new()));
                self.entries.len() - 1
            }
        };

        let phrases = &mut self.entries[index].1;
        for indicator in indicators {
            let indicator = crate::normalize(indicator.as_ref().trim());
            if !indicator.is_empty() && !phrases.contains(&indicator) {
                phrases.push(indicator);
            }
        }
    }

    /// Indicator phrases for `relation` (empty when the type is not registered)
    pub fn indicators_of(&self, relation: RelationType) -> &[String] {
        self.entries
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, indicators)| indicators.as_slice())
            .unwrap_or(&[])
    }

    /// Relation types with at least one indicator present in `normalized`.
    ///
    /// `normalized` must already be passed through [`crate::normalize`].
    pub fn matched_types(&self, normalized: &str) -> Vec<RelationType> {
        self.entries
            .iter()
            .filter(|(_, indicators)| indicators.iter().any(|i| normalized.contains(i.as_str())))
            .map(|(relation, _)| *relation)
            .collect()
    }

    pub fn relation_types(&self) -> impl Iterator<Item = RelationType> + '_ {
        self.entries.iter().map(|(relation, _)| *relation)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
