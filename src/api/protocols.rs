use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::engine::{ChainSelection, ProtocolBreakdown};
use crate::error::AppError;
use crate::orchestration::{ProtocolsRequest, ProtocolsView};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolsQuery {
    pub chains: Option<String>,
    pub hide_forks: Option<bool>,
    pub extra_tvls: Option<String>,
}

impl ProtocolsQuery {
    fn into_request(self, state: &AppState) -> ProtocolsRequest {
        ProtocolsRequest {
            selection: ChainSelection::parse(self.chains.as_deref()),
            hide_forks: self.hide_forks.unwrap_or(false),
            toggles: state.toggles_for(self.extra_tvls.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolQuery {
    pub extra_tvls: Option<String>,
}

pub async fn get_protocols(
    Query(params): Query<ProtocolsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ProtocolsView>, AppError> {
    let request = params.into_request(&state);
    let view = state.orchestrator.protocols(&request).await?;
    if !view.issues.is_empty() {
        tracing::warn!(issues = view.issues.len(), "Protocols view produced engine issues");
    }
    Ok(Json(view))
}

pub async fn get_recent_protocols(
    Query(params): Query<ProtocolsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ProtocolsView>, AppError> {
    let request = params.into_request(&state);
    let now = chrono::Utc::now().timestamp();
    let view = state.orchestrator.recent_protocols(&request, now).await?;
    Ok(Json(view))
}

pub async fn get_protocol(
    Path(name): Path<String>,
    Query(params): Query<ProtocolQuery>,
    State(state): State<AppState>,
) -> Result<Json<ProtocolBreakdown>, AppError> {
    let toggles = state.toggles_for(params.extra_tvls.as_deref());
    let breakdown = state.orchestrator.protocol(&name, &toggles).await?;
    Ok(Json(breakdown))
}
