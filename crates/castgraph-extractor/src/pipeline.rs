//! Extraction pipeline
//!
//! Runs mention extraction and relation tagging over one text unit and
//! turns the result into evidence triples for the relationship graph.

use std::collections::BTreeSet;
use std::sync::Arc;

use castgraph_core::{
    AppConfig, EntityId, EntityPair, EvidenceTriple, PairingMode, Result, TextUnit,
};

use crate::relation::all_pairs;
use crate::{
    AliasCatalog, AliasMatcher, EntityExtractor, IndicatorTagger, RelationExtractor,
    RelationLexicon,
};

/// Everything learned from a single text unit
#[derive(Debug, Clone, Default)]
pub struct UnitExtraction {
    pub entities: BTreeSet<EntityId>,
    /// Untyped co-occurrences (every pair of entities in the unit)
    pub cooccurrences: Vec<EntityPair>,
    pub evidence: Vec<EvidenceTriple>,
}

/// Mention extractor + relation tagger
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    matcher: AliasMatcher,
    tagger: IndicatorTagger,
    pairing: PairingMode,
    snippet_chars: usize,
}

impl ExtractionPipeline {
    pub fn new(catalog: AliasCatalog, lexicon: RelationLexicon) -> Self {
        Self {
            matcher: AliasMatcher::new(Arc::new(catalog)),
            tagger: IndicatorTagger::new(Arc::new(lexicon)),
            pairing: PairingMode::AllPairs,
            snippet_chars: 100,
        }
    }

    /// Build from configuration, falling back to the built-in cast and lexicon
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = match &config.cast {
            Some(table) => AliasCatalog::from_table(table),
            None => AliasCatalog::builtin(),
        };
        let lexicon = match &config.lexicon {
            Some(table) => RelationLexicon::from_table(table)?,
            None => RelationLexicon::builtin(),
        };

        Ok(Self::new(catalog, lexicon)
            .with_pairing(config.extraction.pairing)
            .with_snippet_chars(config.extraction.snippet_chars))
    }

    pub fn with_pairing(mut self, pairing: PairingMode) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    pub fn pairing(&self) -> PairingMode {
        self.pairing
    }

    pub fn matcher(&self) -> &AliasMatcher {
        &self.matcher
    }

    pub fn tagger(&self) -> &IndicatorTagger {
        &self.tagger
    }

    /// Extract entities, co-occurrences and evidence from one text unit
    pub fn process(&self, unit: &TextUnit) -> UnitExtraction {
        let entities = self.matcher.extract_entities(&unit.text);
        if entities.len() < 2 {
            return UnitExtraction {
                entities,
                ..Default::default()
            };
        }

        let relations = match self.pairing {
            PairingMode::AllPairs => self.tagger.extract_relations(&unit.text, &entities),
            PairingMode::Adjacent => {
                let mentions = self.matcher.locate_entities(&unit.text);
                self.tagger.extract_adjacent_relations(&unit.text, &mentions)
            }
        };

        let snippet = unit.snippet(self.snippet_chars);
        let evidence = relations
            .into_iter()
            .map(|tagged| {
                EvidenceTriple::new(tagged.pair, tagged.relation)
                    .with_provenance(snippet.clone(), unit.source_id.clone())
            })
            .collect();

        UnitExtraction {
            cooccurrences: all_pairs(&entities),
            entities,
            evidence,
        }
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(AliasCatalog::builtin(), RelationLexicon::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castgraph_core::RelationType;

    fn alice_barb() -> ExtractionPipeline {
        ExtractionPipeline::new(
            AliasCatalog::from_entries([("A", vec!["alice"]), ("B", vec!["barb"])]),
            RelationLexicon::from_entries([(RelationType::Familial, vec!["mother"])]),
        )
    }

    #[test]
    fn test_process_mother_sentence() {
        let pipeline = alice_barb();
        let unit = TextUnit::new("Alice is Barb's mother.", "page-1");

        let result = pipeline.process(&unit);
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.cooccurrences.len(), 1);
        assert_eq!(result.evidence.len(), 1);

        let triple = &result.evidence[0];
        assert_eq!(triple.pair, EntityPair::new("A", "B").unwrap());
        assert_eq!(triple.relation, RelationType::Familial);
        assert_eq!(triple.snippet, "Alice is Barb's mother.");
        assert_eq!(triple.source_id, "page-1");
    }

    #[test]
    fn test_process_single_entity() {
        let pipeline = alice_barb();
        let result = pipeline.process(&TextUnit::new("Alice is a mother.", "page-1"));
        assert_eq!(result.entities.len(), 1);
        assert!(result.cooccurrences.is_empty());
        assert!(result.evidence.is_empty());
    }

    #[test]
    fn test_cooccurrence_without_indicator() {
        let pipeline = alice_barb();
        let result = pipeline.process(&TextUnit::new("Alice waves at Barb.", "page-1"));
        assert_eq!(result.cooccurrences.len(), 1);
        assert!(result.evidence.is_empty());
    }

    #[test]
    fn test_adjacent_pairing() {
        let pipeline = ExtractionPipeline::new(
            AliasCatalog::from_entries([
                ("A", vec!["alice"]),
                ("B", vec!["barb"]),
                ("C", vec!["carl"]),
            ]),
            RelationLexicon::from_entries([(RelationType::Conflict, vec!["fight"])]),
        )
        .with_pairing(PairingMode::Adjacent);

        let result = pipeline.process(&TextUnit::new("Alice and Barb fight Carl.", "s"));
        assert_eq!(result.cooccurrences.len(), 3);
        assert_eq!(result.evidence.len(), 2);
        assert!(!result
            .evidence
            .iter()
            .any(|t| t.pair == EntityPair::new("A", "C").unwrap()));
    }

    #[test]
    fn test_from_config_rejects_unknown_type() {
        let mut config = AppConfig::default();
        let mut lexicon = std::collections::BTreeMap::new();
        lexicon.insert("nemesis".to_string(), vec!["arch".to_string()]);
        config.lexicon = Some(lexicon);

        assert!(ExtractionPipeline::from_config(&config).is_err());
    }
}
