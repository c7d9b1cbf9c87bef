//! castgraph Crawler - Crawl sessions
//!
//! Fetches source documents, reduces HTML to paragraph text and feeds
//! it through the extraction pipeline into the session's relationship
//! graph. Each source is ingested at most once.
//!
//! Author: hephaex@gmail.com

pub mod fetch;
pub mod html;
pub mod session;

pub use fetch::{DocumentFetcher, FileFetcher, HttpFetcher, SourceKind};
pub use html::HtmlExtractor;
pub use session::{CrawlReport, CrawlSession, IngestOutcome, SkippedSource, VisitedSet};
