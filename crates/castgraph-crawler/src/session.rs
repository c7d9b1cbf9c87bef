//! Crawl session
//!
//! Owns the relationship graph and the set of visited sources. Sources
//! are processed one at a time; the fetch is the only suspension point
//! and a politeness delay separates consecutive requests.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use castgraph_core::{AppConfig, CuratedFact, Result};
use castgraph_extractor::segment::text_units;
use castgraph_extractor::ExtractionPipeline;
use castgraph_graph::{classify, Classification, GraphSnapshot, MergeReport, RelationshipGraph};

use crate::{DocumentFetcher, HtmlExtractor};

/// Default pause between two fetches
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// Source ids already ingested in this or a prior run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    sources: BTreeSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.sources.contains(source_id)
    }

    /// Mark `source_id` visited; false if it already was
    pub fn insert(&mut self, source_id: impl Into<String>) -> bool {
        self.sources.insert(source_id.into())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn to_set(&self) -> BTreeSet<String> {
        self.sources.clone()
    }
}

impl From<BTreeSet<String>> for VisitedSet {
    fn from(sources: BTreeSet<String>) -> Self {
        Self { sources }
    }
}

/// Result of ingesting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub source_id: String,
    /// Text units the document was split into
    pub units: usize,
    /// Evidence triples recorded into the graph
    pub evidence: usize,
    /// True when the source had already been visited and nothing was done
    pub already_visited: bool,
}

/// A source that could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: String,
}

/// Summary of a crawl batch
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Sources ingested in this batch, in order
    pub ingested: Vec<String>,
    /// Sources skipped because fetching or parsing failed
    pub skipped: Vec<SkippedSource>,
    /// Sources ignored because they were visited earlier
    pub already_visited: Vec<String>,
    /// Evidence triples recorded in this batch
    pub evidence_recorded: usize,
    /// The batch stopped early on cancellation
    pub cancelled: bool,
}

impl CrawlReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Sequential crawler feeding a single relationship graph
#[derive(Debug)]
pub struct CrawlSession {
    pipeline: ExtractionPipeline,
    graph: RelationshipGraph,
    visited: VisitedSet,
    delay: Duration,
    cancel: CancellationToken,
}

impl CrawlSession {
    pub fn new(pipeline: ExtractionPipeline) -> Self {
        Self {
            pipeline,
            graph: RelationshipGraph::new(),
            visited: VisitedSet::new(),
            delay: DEFAULT_DELAY,
            cancel: CancellationToken::new(),
        }
    }

    /// Session configured from `config`, with an empty graph
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let pipeline = ExtractionPipeline::from_config(config)?;
        let mut session = Self::new(pipeline)
            .with_delay(Duration::from_millis(config.crawler.delay_ms));
        session.graph = RelationshipGraph::new().with_max_snippets(config.extraction.max_snippets);
        Ok(session)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resume from a persisted snapshot
    ///
    /// The session's snippet limit wins over the one saved with the graph.
    pub fn with_snapshot(mut self, snapshot: GraphSnapshot) -> Self {
        let max_snippets = self.graph.max_snippets();
        self.graph = snapshot.graph;
        self.graph.set_max_snippets(max_snippets);
        self.visited = VisitedSet::from(snapshot.visited_sources);
        self
    }

    /// Current graph and visited set, ready to persist
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.graph.clone(), self.visited.to_set())
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn into_graph(self) -> RelationshipGraph {
        self.graph
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Token that stops a running crawl before its next source
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn merge_curated_facts(&mut self, facts: &[CuratedFact]) -> MergeReport {
        self.graph.merge_curated_facts(facts)
    }

    pub fn classify(&self) -> Classification {
        classify(&self.graph)
    }

    /// Ingest plain document text; a visited source is a no-op
    pub fn ingest(&mut self, source_id: &str, document_text: &str) -> IngestOutcome {
        if self.visited.contains(source_id) {
            debug!(source = source_id, "Source already visited");
            return IngestOutcome {
                source_id: source_id.to_string(),
                units: 0,
                evidence: 0,
                already_visited: true,
            };
        }

        let units = text_units(document_text, source_id);
        let mut evidence = 0;

        for unit in &units {
            let extraction = self.pipeline.process(unit);
            for pair in &extraction.cooccurrences {
                self.graph.record_cooccurrence(pair);
            }
            for triple in &extraction.evidence {
                self.graph.record_evidence(triple);
            }
            if !extraction.evidence.is_empty() {
                debug!(
                    source = source_id,
                    entities = extraction.entities.len(),
                    triples = extraction.evidence.len(),
                    "Recorded evidence"
                );
            }
            evidence += extraction.evidence.len();
        }

        self.visited.insert(source_id);

        IngestOutcome {
            source_id: source_id.to_string(),
            units: units.len(),
            evidence,
            already_visited: false,
        }
    }

    /// Fetch and ingest `sources` in order
    ///
    /// Unavailable sources are skipped and reported; they stay unvisited
    /// so a later run retries them.
    pub async fn crawl<F>(&mut self, fetcher: &F, sources: &[String]) -> CrawlReport
    where
        F: DocumentFetcher + ?Sized,
    {
        let mut report = CrawlReport::default();
        let mut fetched_any = false;

        for source_id in sources {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            if self.visited.contains(source_id) {
                debug!(source = %source_id, "Skipping visited source");
                report.already_visited.push(source_id.clone());
                continue;
            }

            if fetched_any && !self.delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        report.cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
            fetched_any = true;

            info!(source = %source_id, "Crawling");
            let text = match fetcher.fetch(source_id).await {
                Ok(body) => HtmlExtractor::shared()
                    .and_then(|extractor| extractor.document_text(source_id, &body)),
                Err(e) => Err(e),
            };

            match text {
                Ok(text) => {
                    let outcome = self.ingest(source_id, &text);
                    info!(
                        source = %source_id,
                        units = outcome.units,
                        evidence = outcome.evidence,
                        "Ingested source"
                    );
                    report.evidence_recorded += outcome.evidence;
                    report.ingested.push(source_id.clone());
                }
                Err(e) => {
                    warn!(source = %source_id, error = %e, "Skipping unavailable source");
                    report.skipped.push(SkippedSource {
                        source_id: source_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.cancelled {
            info!(ingested = report.ingested.len(), "Crawl cancelled");
        }
        report
    }
}
