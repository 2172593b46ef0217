//! Snapshot source abstraction: where the engine's input records come from.

use crate::domain::Snapshot;
use async_trait::async_trait;
use std::fmt;

pub mod file;
pub mod mock;

pub use file::FileSnapshotSource;
pub use mock::MockSnapshotSource;

/// Supplies the snapshot an engine invocation runs against.
///
/// Implementations return a fully merged snapshot (fork registry applied);
/// the engine never reaches past this trait for data.
#[async_trait]
pub trait SnapshotSource: Send + Sync + fmt::Debug {
    /// Load the current snapshot.
    async fn load(&self) -> Result<Snapshot, DataSourceError>;
}

/// Error type for snapshot loading.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Snapshot could not be read (missing file, permissions).
    Io(String),
    /// Snapshot content is not valid JSON for the expected shape.
    ParseError(String),
    /// Other error
    Other(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::Io(msg) => write!(f, "IO error: {}", msg),
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for DataSourceError {}
