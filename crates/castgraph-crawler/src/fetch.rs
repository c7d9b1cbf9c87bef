//! Document fetching

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use castgraph_core::{CastError, CrawlerConfig, Result};

/// How a source's HTML is navigated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Wiki character page; only the relationships section is read
    Wiki,
    /// Review or article page; every article paragraph is read
    Review,
}

impl SourceKind {
    pub fn classify(source_id: &str) -> Self {
        if source_id.contains("/wiki/") {
            Self::Wiki
        } else {
            Self::Review
        }
    }
}

/// Trait for retrieving a source's raw document
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the document body for `source_id`
    async fn fetch(&self, source_id: &str) -> Result<String>;
}

fn unavailable(source_id: &str, reason: impl Into<String>) -> CastError {
    CastError::SourceUnavailable {
        source_id: source_id.to_string(),
        reason: reason.into(),
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Fetches sources over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CastError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, source_id: &str) -> Result<String> {
        let response = self
            .client
            .get(source_id)
            .send()
            .await
            .map_err(|e| unavailable(source_id, format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(source_id, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(source_id, format!("Failed to read body: {e}")))?;

        if body.trim().is_empty() {
            return Err(unavailable(source_id, "Empty response body"));
        }

        tracing::debug!(source = source_id, bytes = body.len(), "Fetched document");
        Ok(body)
    }
}

// ============================================================================
// Local files
// ============================================================================

/// Reads sources from the local filesystem; the source id is the path
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative source ids against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, source_id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(source_id),
            None => PathBuf::from(source_id),
        }
    }
}

#[async_trait]
impl DocumentFetcher for FileFetcher {
    async fn fetch(&self, source_id: &str) -> Result<String> {
        let path = self.resolve(source_id);
        let body = tokio::fs::read_to_string(&path).await.map_err(|e| {
            unavailable(source_id, format!("Failed to read {}: {e}", path.display()))
        })?;

        if body.trim().is_empty() {
            return Err(unavailable(source_id, "Empty file"));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sources() {
        assert_eq!(
            SourceKind::classify("https://arrow.fandom.com/wiki/Oliver_Queen"),
            SourceKind::Wiki
        );
        assert_eq!(
            SourceKind::classify("https://www.joblo.com/tv-review-arrow-season-4-episode-7"),
            SourceKind::Review
        );
        assert_eq!(SourceKind::classify("notes/episode.txt"), SourceKind::Review);
    }

    #[test]
    fn test_http_fetcher_from_config() {
        assert!(HttpFetcher::new(&CrawlerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_file_fetcher_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ep1.txt"), "Oliver trains Roy.").unwrap();

        let fetcher = FileFetcher::with_root(dir.path());
        assert_eq!(fetcher.fetch("ep1.txt").await.unwrap(), "Oliver trains Roy.");
    }

    #[tokio::test]
    async fn test_file_fetcher_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "  \n").unwrap();
        let fetcher = FileFetcher::with_root(dir.path());

        let missing = fetcher.fetch("missing.txt").await.unwrap_err();
        assert!(matches!(missing, CastError::SourceUnavailable { .. }));

        let empty = fetcher.fetch("empty.txt").await.unwrap_err();
        assert!(matches!(empty, CastError::SourceUnavailable { .. }));
    }
}
