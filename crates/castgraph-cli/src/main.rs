//! castgraph CLI - Command-line interface
//!
//! Usage:
//!   castgraph crawl [url]...
//!   castgraph ingest <file>...
//!   castgraph report
//!   castgraph extract <text>

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use castgraph_core::presets::{default_curated_facts, DEFAULT_SOURCES};
use castgraph_core::{AppConfig, LoggingConfig};
use castgraph_crawler::{CrawlReport, CrawlSession, FileFetcher, HttpFetcher};
use castgraph_extractor::segment::text_units;
use castgraph_extractor::ExtractionPipeline;
use castgraph_graph::{
    classify, to_dot, GraphStore, JsonFileStore, RelationshipGraph, RelationshipReport,
};

const DEFAULT_STATE_FILE: &str = "castgraph-state.json";

/// Pairs listed in the console interaction summary
const TOP_INTERACTIONS: usize = 10;

#[derive(Parser)]
#[command(name = "castgraph")]
#[command(about = "Cast relationship extraction from wiki pages and reviews")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl URLs (the configured source list when none are given)
    Crawl {
        urls: Vec<String>,
        /// Session state file
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,
        /// Write the JSON report here
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the Graphviz rendering here
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Ingest local text or HTML files
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Session state file
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,
    },
    /// Print and export the report of the stored session
    Report {
        /// Session state file
        #[arg(long, default_value = DEFAULT_STATE_FILE)]
        state: PathBuf,
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        dot: Option<PathBuf>,
    },
    /// Show the entities and relations found in a piece of text
    Extract { text: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Crawl {
            urls,
            state,
            json,
            dot,
        } => {
            let store = JsonFileStore::new(state);
            let mut session = open_session(&config, &store).await?;

            let sources = if urls.is_empty() {
                config.sources.clone().unwrap_or_else(|| {
                    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
                })
            } else {
                urls
            };

            let token = session.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl+C, stopping after the current source");
                    token.cancel();
                }
            });

            let fetcher = HttpFetcher::new(&config.crawler)?;
            let report = session.crawl(&fetcher, &sources).await;
            print_crawl_summary(&report);

            store.save(&session.snapshot()).await?;
            let graph = with_curated_facts(session.graph(), &config);
            print_report(&graph);
            export(&graph, json.as_deref(), dot.as_deref()).await?;
        }
        Commands::Ingest { files, state } => {
            let store = JsonFileStore::new(state);
            let mut session = open_session(&config, &store).await?.with_delay(Duration::ZERO);

            let sources: Vec<String> = files
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect();
            let report = session.crawl(&FileFetcher::new(), &sources).await;
            print_crawl_summary(&report);

            store.save(&session.snapshot()).await?;
        }
        Commands::Report { state, json, dot } => {
            let store = JsonFileStore::new(state);
            let graph = match store.load().await? {
                Some(snapshot) => snapshot.graph,
                None => {
                    warn!(
                        path = %store.path().display(),
                        "No saved session, reporting curated facts only"
                    );
                    RelationshipGraph::new()
                }
            };

            let graph = with_curated_facts(&graph, &config);
            print_report(&graph);
            export(&graph, json.as_deref(), dot.as_deref()).await?;
        }
        Commands::Extract { text } => {
            let pipeline = ExtractionPipeline::from_config(&config)?;
            print_extraction(&pipeline, &text);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    if logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn open_session(config: &AppConfig, store: &JsonFileStore) -> anyhow::Result<CrawlSession> {
    let session = CrawlSession::from_config(config)?;

    match store.load().await? {
        Some(snapshot) => {
            info!(
                path = %store.path().display(),
                sources = snapshot.visited_sources.len(),
                edges = snapshot.graph.edge_count(),
                "Resuming saved session"
            );
            Ok(session.with_snapshot(snapshot))
        }
        None => Ok(session),
    }
}

/// Crawled graph with the configured curated facts laid over it
///
/// Curated facts are not written to the session state, so edits to the
/// configured list take effect on the next report.
fn with_curated_facts(graph: &RelationshipGraph, config: &AppConfig) -> RelationshipGraph {
    let facts = config.curated.clone().unwrap_or_else(default_curated_facts);
    let mut graph = graph.clone();

    let merge = graph.merge_curated_facts(&facts);
    info!(
        applied = merge.applied,
        rejected = merge.rejected_count(),
        "Merged curated facts"
    );
    graph
}

fn print_crawl_summary(report: &CrawlReport) {
    println!(
        "Crawled {} source(s): {} evidence triple(s), {} skipped, {} already visited{}",
        report.ingested.len(),
        report.evidence_recorded,
        report.skipped_count(),
        report.already_visited.len(),
        if report.cancelled { " (cancelled)" } else { "" },
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.source_id, skipped.reason);
    }
}

fn print_report(graph: &RelationshipGraph) {
    println!("\n{}", "=".repeat(60));
    println!("CAST RELATIONSHIP ANALYSIS");
    println!("{}", "=".repeat(60));
    println!(
        "{} characters, {} relationships, {} crawled mentions",
        graph.node_count(),
        graph.edge_count(),
        graph.total_evidence()
    );

    for (relation, edges) in classify(graph).iter() {
        println!("\n{}:", relation.heading());
        if edges.is_empty() {
            println!("  (none)");
        }
        for edge in edges {
            println!("  - {}: {}", edge.characters(), edge.summary());
        }
    }

    let mut interactions: Vec<_> = graph.interactions().iter().collect();
    if !interactions.is_empty() {
        interactions.sort_by(|a, b| b.count.cmp(&a.count));
        println!("\nMOST FREQUENT INTERACTIONS:");
        for interaction in interactions.into_iter().take(TOP_INTERACTIONS) {
            println!("  - {}: {}", interaction.pair, interaction.count);
        }
    }
}

fn print_extraction(pipeline: &ExtractionPipeline, text: &str) {
    for unit in text_units(text, "cli") {
        let extraction = pipeline.process(&unit);
        println!("{}", unit.text);

        let entities: Vec<&str> = extraction.entities.iter().map(|e| e.as_str()).collect();
        println!("  entities: {}", entities.join(", "));
        for triple in &extraction.evidence {
            println!("  {} -> {}", triple.pair, triple.relation.as_str());
        }
    }
}

async fn export(
    graph: &RelationshipGraph,
    json: Option<&Path>,
    dot: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(path) = json {
        let report = RelationshipReport::build(graph).to_json_pretty()?;
        tokio::fs::write(path, report)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("\nReport saved to {}", path.display());
    }

    if let Some(path) = dot {
        tokio::fs::write(path, to_dot(graph))
            .await
            .with_context(|| format!("Failed to write network to {}", path.display()))?;
        println!("Network saved to {}", path.display());
    }

    Ok(())
}
