//! JSON snapshot file written by the upstream provider.

use super::{DataSourceError, SnapshotSource};
use crate::domain::Snapshot;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the snapshot file on every load, so a provider can replace it
/// between requests.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Parse snapshot JSON and apply the fork registry.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot, DataSourceError> {
    let mut snapshot: Snapshot =
        serde_json::from_slice(bytes).map_err(|e| DataSourceError::ParseError(e.to_string()))?;
    snapshot.apply_fork_registry();
    Ok(snapshot)
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn load(&self) -> Result<Snapshot, DataSourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DataSourceError::Io(format!("{}: {}", self.path.display(), e)))?;
        let snapshot = parse_snapshot(&bytes)?;

        tracing::debug!(
            path = %self.path.display(),
            protocols = snapshot.protocols.len(),
            chains = snapshot.chain_tvls.len(),
            days = snapshot.stacked_dataset.len(),
            "Loaded snapshot"
        );

        Ok(snapshot)
    }
}
