//! In-memory snapshot source for tests.

use super::{DataSourceError, SnapshotSource};
use crate::domain::{ChainGroup, ChainRecord, ProtocolRecord, Snapshot, StackedDay};
use async_trait::async_trait;

/// Mock source that hands out a clone of a prepared snapshot.
#[derive(Debug, Clone, Default)]
pub struct MockSnapshotSource {
    snapshot: Snapshot,
    fail_with: Option<DataSourceError>,
}

impl MockSnapshotSource {
    /// Create a new mock source with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Add the chain to the page's chain list.
    pub fn with_chain(mut self, chain: &str) -> Self {
        self.snapshot.chains.push(chain.to_string());
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolRecord) -> Self {
        self.snapshot.protocols.push(protocol);
        self
    }

    pub fn with_chain_tvl(mut self, chain: ChainRecord) -> Self {
        self.snapshot.chain_tvls.push(chain);
        self
    }

    pub fn with_day(mut self, day: StackedDay) -> Self {
        self.snapshot.stacked_dataset.push(day);
        self
    }

    pub fn with_group(mut self, group: ChainGroup) -> Self {
        self.snapshot.chain_groups.push(group);
        self
    }

    pub fn with_category(mut self, category: &str, chains: &[&str]) -> Self {
        self.snapshot.categories.insert(
            category.to_string(),
            chains.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn with_fork(mut self, protocol: &str) -> Self {
        self.snapshot.forks.insert(protocol.to_string(), true);
        self
    }

    /// Make every load fail with `error`.
    pub fn failing(mut self, error: DataSourceError) -> Self {
        self.fail_with = Some(error);
        self
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn load(&self) -> Result<Snapshot, DataSourceError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let mut snapshot = self.snapshot.clone();
        snapshot.apply_fork_registry();
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_builder_and_forks() {
        let source = MockSnapshotSource::new()
            .with_chain("Ethereum")
            .with_protocol(ProtocolRecord::new("Fork", vec!["Ethereum".to_string()]))
            .with_fork("Fork");
        let snapshot = tokio_test::block_on(source.load()).unwrap();
        assert_eq!(snapshot.chains, vec!["Ethereum".to_string()]);
        assert!(snapshot.protocols[0].forked);
    }

    #[test]
    fn test_mock_failure() {
        let source = MockSnapshotSource::new().failing(DataSourceError::Other("down".to_string()));
        assert!(tokio_test::block_on(source.load()).is_err());
    }
}
