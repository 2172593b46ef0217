use crate::datasource::{DataSourceError, SnapshotSource};
use crate::domain::ExtraTvlToggleSet;
use crate::engine::{protocol_breakdown, ProtocolBreakdown};
use crate::orchestration::pipeline::{
    build_chains_overview, build_protocols_view, build_recent_protocols_view, ChainsOverview,
    ChainsRequest, ProtocolsRequest, ProtocolsView,
};
use std::sync::Arc;
use thiserror::Error;

/// Loads a fresh snapshot per call and runs the matching pipeline on it.
#[derive(Clone)]
pub struct Orchestrator {
    source: Arc<dyn SnapshotSource>,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    /// Load the snapshot once without building anything.
    pub async fn check_source(&self) -> Result<(), OrchestrationError> {
        self.source.load().await?;
        Ok(())
    }

    pub async fn chains_overview(
        &self,
        request: &ChainsRequest,
    ) -> Result<ChainsOverview, OrchestrationError> {
        let snapshot = self.source.load().await?;
        Ok(build_chains_overview(&snapshot, request))
    }

    pub async fn protocols(
        &self,
        request: &ProtocolsRequest,
    ) -> Result<ProtocolsView, OrchestrationError> {
        let snapshot = self.source.load().await?;
        Ok(build_protocols_view(&snapshot, request))
    }

    /// Recently listed protocols relative to `now` (unix seconds).
    pub async fn recent_protocols(
        &self,
        request: &ProtocolsRequest,
        now: i64,
    ) -> Result<ProtocolsView, OrchestrationError> {
        let snapshot = self.source.load().await?;
        Ok(build_recent_protocols_view(&snapshot, request, now))
    }

    pub async fn protocol(
        &self,
        name: &str,
        toggles: &ExtraTvlToggleSet,
    ) -> Result<ProtocolBreakdown, OrchestrationError> {
        let snapshot = self.source.load().await?;
        let record = snapshot
            .find_protocol(name)
            .ok_or_else(|| OrchestrationError::UnknownProtocol(name.to_string()))?;
        Ok(protocol_breakdown(record, toggles))
    }
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Source(#[from] DataSourceError),
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MockSnapshotSource;
    use crate::domain::{Decimal, ProtocolRecord, TvlSeries};

    fn orchestrator() -> Orchestrator {
        let source = MockSnapshotSource::new().with_chain("Ethereum").with_protocol(
            ProtocolRecord::new("Aave", vec!["Ethereum".to_string()])
                .with_section("Ethereum", TvlSeries::current(Decimal::from(10))),
        );
        Orchestrator::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_protocol_lookup_is_case_insensitive() {
        let breakdown = orchestrator()
            .protocol("aave", &ExtraTvlToggleSet::new())
            .await
            .unwrap();
        assert_eq!(breakdown.protocol.name, "Aave");
    }

    #[tokio::test]
    async fn test_unknown_protocol() {
        let err = orchestrator()
            .protocol("nope", &ExtraTvlToggleSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::UnknownProtocol(_)));
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let source = MockSnapshotSource::new().failing(DataSourceError::Io("gone".to_string()));
        let request = ProtocolsRequest {
            selection: Default::default(),
            hide_forks: false,
            toggles: ExtraTvlToggleSet::new(),
        };
        let err = Orchestrator::new(Arc::new(source))
            .protocols(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestrationError::Source(_)));
    }
}
