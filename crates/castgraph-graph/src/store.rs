//! Graph persistence
//!
//! A snapshot carries the accumulated graph plus the set of sources
//! already ingested, so a later session can resume without re-counting.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use castgraph_core::{CastError, Result};

use crate::RelationshipGraph;

/// Persisted crawl state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub graph: RelationshipGraph,
    #[serde(default)]
    pub visited_sources: BTreeSet<String>,
    pub saved_at: DateTime<Utc>,
}

impl GraphSnapshot {
    pub fn new(graph: RelationshipGraph, visited_sources: BTreeSet<String>) -> Self {
        Self {
            graph,
            visited_sources,
            saved_at: Utc::now(),
        }
    }
}

/// Trait for snapshot storage
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Load the last snapshot, or `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<GraphSnapshot>>;

    /// Replace the stored snapshot
    async fn save(&self, snapshot: &GraphSnapshot) -> Result<()>;
}

/// Snapshot stored as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| format!("{}.tmp", name.to_string_lossy()))
            .unwrap_or_else(|| "castgraph-state.json.tmp".to_string());
        self.path.with_file_name(file_name)
    }

    fn storage_error(&self, action: &str, e: std::io::Error) -> CastError {
        CastError::StorageError(format!("{action} {}: {e}", self.path.display()))
    }
}

#[async_trait]
impl GraphStore for JsonFileStore {
    async fn load(&self) -> Result<Option<GraphSnapshot>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error("Failed to read", e)),
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let snapshot: GraphSnapshot = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            edges = snapshot.graph.edge_count(),
            sources = snapshot.visited_sources.len(),
            "Loaded graph snapshot"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &GraphSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| self.storage_error("Failed to create directory for", e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.temp_path();

        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| self.storage_error("Failed to create", e))?;
        file.write_all(&json)
            .await
            .map_err(|e| self.storage_error("Failed to write", e))?;
        file.sync_all()
            .await
            .map_err(|e| self.storage_error("Failed to sync", e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.storage_error("Failed to replace", e))?;

        tracing::debug!(path = %self.path.display(), "Saved graph snapshot");
        Ok(())
    }
}
