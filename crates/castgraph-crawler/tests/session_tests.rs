//! Crawl session integration tests
//!
//! Drives the full pipeline (fetch -> paragraphs -> units -> graph ->
//! report) with a scripted in-memory fetcher.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use castgraph_core::{CastError, CuratedFact, EntityPair, RelationType, Result};
use castgraph_crawler::{CrawlSession, DocumentFetcher};
use castgraph_extractor::{AliasCatalog, ExtractionPipeline, RelationLexicon};
use castgraph_graph::{GraphStore, JsonFileStore, RelationshipReport};

/// Serves canned documents and records every fetch
#[derive(Default)]
struct ScriptedFetcher {
    documents: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn with(mut self, source_id: &str, body: &str) -> Self {
        self.documents.insert(source_id.to_string(), body.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for ScriptedFetcher {
    async fn fetch(&self, source_id: &str) -> Result<String> {
        self.calls.lock().unwrap().push(source_id.to_string());
        self.documents
            .get(source_id)
            .cloned()
            .ok_or_else(|| CastError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}

fn alice_barb_session() -> CrawlSession {
    CrawlSession::new(ExtractionPipeline::new(
        AliasCatalog::from_entries([("A", vec!["alice"]), ("B", vec!["barb"])]),
        RelationLexicon::from_entries([
            (RelationType::Familial, vec!["mother"]),
            (RelationType::Friendship, vec!["friend"]),
            (RelationType::Conflict, vec!["enemy"]),
        ]),
    ))
    .with_delay(Duration::ZERO)
}

fn arrow_session() -> CrawlSession {
    CrawlSession::new(ExtractionPipeline::default()).with_delay(Duration::ZERO)
}

fn sources(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn ab() -> EntityPair {
    EntityPair::new("A", "B").unwrap()
}

#[test]
fn test_mother_sentence_end_to_end() {
    let mut session = alice_barb_session();
    session.ingest("doc", "Alice is Barb's mother.");

    let classification = session.classify();
    let familial = classification.get(RelationType::Familial);
    assert_eq!(familial.len(), 1);
    assert_eq!(familial[0].entity_a.as_str(), "A");
    assert_eq!(familial[0].entity_b.as_str(), "B");
    assert_eq!(familial[0].evidence, 1);
    assert!(!familial[0].authoritative);
}

#[test]
fn test_two_sentences_two_types() {
    let mut session = alice_barb_session();
    session.ingest("doc", "Alice is Barb's friend. Later Barb becomes Alice's enemy.");

    let graph = session.graph();
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.evidence_count(&ab(), RelationType::Friendship), 1);
    assert_eq!(graph.evidence_count(&ab(), RelationType::Conflict), 1);
    assert_eq!(graph.interaction_count(&ab()), 2);
}

#[test]
fn test_ingest_wrapped_plain_text() {
    let mut session = alice_barb_session();
    let outcome = session.ingest("notes.txt", "Alice is\nBarb's mother.");

    assert_eq!(outcome.units, 1);
    assert_eq!(outcome.evidence, 1);
    assert_eq!(session.graph().evidence_count(&ab(), RelationType::Familial), 1);
}

#[test]
fn test_ingest_same_source_twice() {
    let mut once = alice_barb_session();
    once.ingest("doc", "Alice is Barb's mother.");

    let mut twice = alice_barb_session();
    twice.ingest("doc", "Alice is Barb's mother.");
    twice.ingest("doc", "Alice is Barb's mother.");

    assert_eq!(once.graph().edges(), twice.graph().edges());
    assert_eq!(once.graph().interactions(), twice.graph().interactions());
}

#[test]
fn test_distinct_sources_accumulate() {
    let mut session = alice_barb_session();
    session.ingest("doc-1", "Alice is Barb's mother.");
    session.ingest("doc-2", "Barb visits her mother Alice.");

    assert_eq!(session.graph().evidence_count(&ab(), RelationType::Familial), 2);
    let edge = session.graph().edge(&ab(), RelationType::Familial).unwrap();
    assert_eq!(edge.sources.len(), 2);
    assert_eq!(edge.snippets.len(), 2);
}

#[test]
fn test_curated_fact_without_evidence_is_reported() {
    let mut session = alice_barb_session();
    let merge = session.merge_curated_facts(&[
        CuratedFact::new("A", "B", RelationType::Romantic, "Married in season 6"),
        CuratedFact::new("A", "A", RelationType::Romantic, "Self"),
    ]);
    assert_eq!(merge.applied, 1);
    assert_eq!(merge.rejected_count(), 1);

    let report = RelationshipReport::build(session.graph());
    let romantic = report.section(RelationType::Romantic);
    assert_eq!(romantic.len(), 1);
    assert!(romantic[0].authoritative);
    assert_eq!(romantic[0].description.as_deref(), Some("Married in season 6"));
}

#[test]
fn test_curated_merge_keeps_crawled_counts() {
    let mut session = alice_barb_session();
    session.ingest("doc", "Alice is Barb's mother.");
    session.merge_curated_facts(&[CuratedFact::new(
        "B",
        "A",
        RelationType::Familial,
        "Mother and daughter",
    )]);

    let familial = session.classify();
    let entry = &familial.get(RelationType::Familial)[0];
    assert_eq!(entry.evidence, 1);
    assert!(entry.authoritative);
    assert_eq!(entry.summary(), "Mother and daughter (1 mentions)");
}

#[tokio::test]
async fn test_crawl_skips_unavailable_sources() {
    let fetcher = ScriptedFetcher::default()
        .with(
            "https://reviews.example/ep1",
            "<article><p>Alice is Barb's friend.</p></article>",
        )
        .with("https://reviews.example/ep3", "<p>Barb is Alice's enemy.</p>");

    let mut session = alice_barb_session();
    let report = session
        .crawl(
            &fetcher,
            &sources(&[
                "https://reviews.example/ep1",
                "https://reviews.example/ep2",
                "https://reviews.example/ep3",
            ]),
        )
        .await;

    assert_eq!(report.ingested.len(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].source_id, "https://reviews.example/ep2");
    assert_eq!(report.evidence_recorded, 2);
    assert!(!report.cancelled);
    assert!(!session.visited().contains("https://reviews.example/ep2"));
}

#[tokio::test]
async fn test_recrawl_does_not_refetch_visited_sources() {
    let fetcher = ScriptedFetcher::default()
        .with("https://reviews.example/ep1", "<p>Alice is Barb's friend.</p>");
    let batch = sources(&["https://reviews.example/ep1"]);

    let mut session = alice_barb_session();
    session.crawl(&fetcher, &batch).await;
    let second = session.crawl(&fetcher, &batch).await;

    assert_eq!(fetcher.calls().len(), 1);
    assert_eq!(second.already_visited, batch);
    assert_eq!(session.graph().evidence_count(&ab(), RelationType::Friendship), 1);
}

#[tokio::test]
async fn test_crawl_wiki_relationships_section() {
    let page = r#"
        <html><body>
        <p>Oliver Queen is a vigilante.</p>
        <h2><span class="mw-headline" id="Relationships">Relationships</span></h2>
        <p>Thea Queen is Oliver's sister.</p>
        <p>Slade Wilson became Oliver's greatest enemy.</p>
        </body></html>
    "#;
    let url = "https://arrow.fandom.com/wiki/Oliver_Queen";
    let fetcher = ScriptedFetcher::default().with(url, page);

    let mut session = arrow_session();
    let report = session.crawl(&fetcher, &sources(&[url])).await;
    assert_eq!(report.ingested, vec![url.to_string()]);

    let oliver_thea = EntityPair::new("Oliver Queen", "Thea Queen").unwrap();
    let oliver_slade = EntityPair::new("Oliver Queen", "Slade Wilson").unwrap();
    let graph = session.graph();
    assert_eq!(graph.evidence_count(&oliver_thea, RelationType::Familial), 1);
    assert_eq!(graph.evidence_count(&oliver_slade, RelationType::Conflict), 1);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let fetcher = ScriptedFetcher::default().with("a", "Alice is Barb's friend.");
    let mut session = alice_barb_session();
    session.cancellation_token().cancel();

    let report = session.crawl(&fetcher, &sources(&["a"])).await;
    assert!(report.cancelled);
    assert!(fetcher.calls().is_empty());
    assert!(session.graph().is_empty());
}

#[tokio::test]
async fn test_cancel_interrupts_politeness_delay() {
    let mut session = alice_barb_session().with_delay(Duration::from_secs(3600));
    let fetcher = ScriptedFetcher::default()
        .with("a", "Alice is Barb's friend.")
        .with("b", "Alice is Barb's enemy.");

    let token = session.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let report = session.crawl(&fetcher, &sources(&["a", "b"])).await;
    assert!(report.cancelled);
    assert_eq!(report.ingested, vec!["a".to_string()]);
    assert_eq!(fetcher.calls(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_resume_from_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("state.json"));
    let fetcher = ScriptedFetcher::default()
        .with("a", "Alice is Barb's friend.")
        .with("b", "Alice is Barb's friend again.");

    let mut first = alice_barb_session();
    first.crawl(&fetcher, &sources(&["a"])).await;
    store.save(&first.snapshot()).await.unwrap();

    let snapshot = store.load().await.unwrap().unwrap();
    let mut second = alice_barb_session().with_snapshot(snapshot);
    let report = second.crawl(&fetcher, &sources(&["a", "b"])).await;

    assert_eq!(report.already_visited, vec!["a".to_string()]);
    assert_eq!(report.ingested, vec!["b".to_string()]);
    assert_eq!(second.graph().evidence_count(&ab(), RelationType::Friendship), 2);
}
