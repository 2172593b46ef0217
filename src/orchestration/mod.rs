pub mod orchestrator;
pub mod pipeline;

pub use orchestrator::{OrchestrationError, Orchestrator};
pub use pipeline::{
    build_chains_overview, build_protocols_view, build_recent_protocols_view, chains_csv,
    ChainsOverview, ChainsRequest, ProtocolsRequest, ProtocolsView,
};
