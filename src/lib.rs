pub mod api;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{DataSourceError, FileSnapshotSource, MockSnapshotSource, SnapshotSource};
pub use domain::{
    ChainEntity, ChainRecord, Decimal, ExtraTvlToggleSet, ProtocolEntity, ProtocolRecord,
    Snapshot, TvlSeries,
};
pub use error::{AppError, EngineIssue};
pub use orchestration::Orchestrator;
