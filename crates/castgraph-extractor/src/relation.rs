//! Relation tagging
//!
//! A relation type is attached to a pair of entities when the pair
//! co-occurs in a text unit that contains at least one indicator phrase
//! for that type. Tagging is combinatorial: every pair in the unit gets
//! every matched type, regardless of which entities the indicator
//! actually refers to.

use std::collections::BTreeSet;
use std::sync::Arc;

use castgraph_core::{EntityId, EntityPair};

use crate::{Mention, RelationExtractor, RelationLexicon, TaggedRelation};

/// Indicator-phrase relation tagger
#[derive(Debug, Clone)]
pub struct IndicatorTagger {
    lexicon: Arc<RelationLexicon>,
}

impl IndicatorTagger {
    pub fn new(lexicon: Arc<RelationLexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &RelationLexicon {
        &self.lexicon
    }

    /// Variant that only pairs entities adjacent in order of first mention.
    ///
    /// `mentions` is expected in the order produced by
    /// [`crate::EntityExtractor::locate_entities`].
    pub fn extract_adjacent_relations(
        &self,
        text: &str,
        mentions: &[Mention],
    ) -> BTreeSet<TaggedRelation> {
        let mut ordered: Vec<&EntityId> = Vec::with_capacity(mentions.len());
        for mention in mentions {
            if !ordered.contains(&&mention.entity) {
                ordered.push(&mention.entity);
            }
        }

        let pairs = ordered
            .windows(2)
            .filter_map(|w| EntityPair::new(w[0].clone(), w[1].clone()));
        self.tag_pairs(text, pairs)
    }

    fn tag_pairs<I>(&self, text: &str, pairs: I) -> BTreeSet<TaggedRelation>
    where
        I: IntoIterator<Item = EntityPair>,
    {
        let matched = self.lexicon.matched_types(&crate::normalize(text));
        if matched.is_empty() {
            return BTreeSet::new();
        }

        let mut relations = BTreeSet::new();
        for pair in pairs {
            for relation in &matched {
                relations.insert(TaggedRelation {
                    pair: pair.clone(),
                    relation: *relation,
                });
            }
        }
        relations
    }
}

impl Default for IndicatorTagger {
    fn default() -> Self {
        Self::new(Arc::new(RelationLexicon::builtin()))
    }
}

impl RelationExtractor for IndicatorTagger {
    fn extract_relations(
        &self,
        text: &str,
        entities: &BTreeSet<EntityId>,
    ) -> BTreeSet<TaggedRelation> {
        if entities.len() < 2 {
            return BTreeSet::new();
        }
        self.tag_pairs(text, all_pairs(entities))
    }
}

/// Every unordered pair of distinct entities
pub fn all_pairs(entities: &BTreeSet<EntityId>) -> Vec<EntityPair> {
    let list: Vec<&EntityId> = entities.iter().collect();
    let mut pairs = Vec::with_capacity(list.len() * list.len().saturating_sub(1) / 2);
    for (i, a) in list.iter().enumerate() {
        for b in &list[i + 1..] {
            if let Some(pair) = EntityPair::new((*a).clone(), (*b).clone()) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

// ============================================================================
// Tests
// ============================================================================
