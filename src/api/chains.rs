use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::snapshot::ALL_CATEGORY;
use crate::engine::fingerprint;
use crate::error::AppError;
use crate::orchestration::{chains_csv, ChainsOverview, ChainsRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainsQuery {
    pub category: Option<String>,
    pub extra_tvls: Option<String>,
    pub keep: Option<String>,
}

impl ChainsQuery {
    fn into_request(self, state: &AppState) -> Result<ChainsRequest, AppError> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ALL_CATEGORY)
            .to_string();

        let keep_count = match self.keep.as_deref().map(str::trim) {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                AppError::BadRequest("keep must be a non-negative integer".to_string())
            })?,
            None => state.config.pie_keep_count,
        };

        Ok(ChainsRequest {
            grouping_active: state.config.groups_category(&category),
            toggles: state.toggles_for(self.extra_tvls.as_deref()),
            category,
            keep_count,
        })
    }
}

async fn load_overview(
    state: &AppState,
    params: ChainsQuery,
) -> Result<ChainsOverview, AppError> {
    let request = params.into_request(state)?;
    Ok(state.orchestrator.chains_overview(&request).await?)
}

pub async fn get_chains(
    Query(params): Query<ChainsQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let overview = load_overview(&state, params).await?;
    let etag = fingerprint(&overview).map_err(|e| AppError::Internal(e.to_string()))?;

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", etag)) {
        headers.insert(header::ETAG, value);
    }
    Ok((headers, Json(overview)).into_response())
}

pub async fn get_chains_csv(
    Query(params): Query<ChainsQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let overview = load_overview(&state, params).await?;
    let (filename, bytes) = chains_csv(&overview)?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    tracing::info!(filename = %filename, bytes = bytes.len(), "Exported chains CSV");
    Ok((headers, bytes).into_response())
}
