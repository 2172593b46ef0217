//! End-to-end pipelines from a snapshot to view-ready outputs.

use crate::domain::snapshot::ALL_CATEGORY;
use crate::domain::{
    ChainEntity, DailyRow, DailyTvlPoint, ExtraTvlToggleSet, NamedValue, ProtocolEntity, Snapshot,
    StackedDay,
};
use crate::engine::{
    build_daily_series, csv_filename, daily_rows_to_csv, filter_protocols_by_chains,
    group_chains_by_parent, normalize_chains, order_by_listing_age, summarize_top, ChainSelection,
    ExportError,
};
use crate::error::EngineIssue;
use serde::Serialize;

/// Inputs of the chains overview.
#[derive(Debug, Clone)]
pub struct ChainsRequest {
    pub category: String,
    pub toggles: ExtraTvlToggleSet,
    pub keep_count: usize,
    pub grouping_active: bool,
}

/// Everything a chains page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainsOverview {
    pub category: String,
    /// Entity columns, largest chain first.
    pub chain_names: Vec<String>,
    /// Table rows, grouped by parent when grouping is active.
    pub chains: Vec<ChainEntity>,
    pub pie: Vec<NamedValue>,
    pub by_day: Vec<DailyRow>,
    pub dominance_by_day: Vec<DailyTvlPoint>,
}

pub fn build_chains_overview(snapshot: &Snapshot, request: &ChainsRequest) -> ChainsOverview {
    let allowed = snapshot.chains_in_category(&request.category);
    let in_category = |name: &str| {
        allowed
            .as_ref()
            .map_or(true, |set| set.contains(&name.to_lowercase()))
    };

    let records: Vec<_> = snapshot
        .chain_tvls
        .iter()
        .filter(|c| in_category(c.name.as_str()))
        .cloned()
        .collect();
    // Chain views always apply liquid staking and double counting.
    let by_chain = normalize_chains(&records, &request.toggles, true);

    let pie_input: Vec<NamedValue> = by_chain
        .iter()
        .map(|c| NamedValue::new(c.name.clone(), c.figures.tvl()))
        .collect();
    let pie = summarize_top(&pie_input, request.keep_count);

    let dataset: Vec<StackedDay> = snapshot
        .stacked_dataset
        .iter()
        .map(|day| StackedDay {
            date: day.date,
            entities: day
                .entities
                .iter()
                .filter(|(name, _)| in_category(name.as_str()))
                .map(|(name, fields)| (name.clone(), fields.clone()))
                .collect(),
        })
        .collect();
    let series = build_daily_series(&dataset, &request.toggles);

    let chains = group_chains_by_parent(&by_chain, &snapshot.chain_groups, request.grouping_active)
        .into_owned();

    tracing::debug!(
        category = %request.category,
        chains = by_chain.len(),
        rows = chains.len(),
        days = series.by_day.len(),
        "Built chains overview"
    );

    ChainsOverview {
        category: request.category.clone(),
        chain_names: by_chain.iter().map(|c| c.name.clone()).collect(),
        chains,
        pie,
        by_day: series.by_day,
        dominance_by_day: series.dominance_by_day,
    }
}

/// CSV download of the overview's daily values: `(filename, bytes)`.
pub fn chains_csv(overview: &ChainsOverview) -> Result<(String, Vec<u8>), ExportError> {
    let scope = if overview.category == ALL_CATEGORY {
        "chains".to_string()
    } else {
        format!("chains {}", overview.category)
    };
    let bytes = daily_rows_to_csv(&overview.by_day, &overview.chain_names)?;
    Ok((csv_filename(&scope), bytes))
}

/// Inputs of the protocols views.
#[derive(Debug, Clone)]
pub struct ProtocolsRequest {
    pub selection: ChainSelection,
    pub hide_forks: bool,
    pub toggles: ExtraTvlToggleSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolsView {
    pub selected_chains: Vec<String>,
    pub protocols: Vec<ProtocolEntity>,
    pub issues: Vec<EngineIssue>,
}

/// Chain-scoped protocol table ordered by TVL descending.
pub fn build_protocols_view(snapshot: &Snapshot, request: &ProtocolsRequest) -> ProtocolsView {
    let scoped = filter_protocols_by_chains(
        &snapshot.protocols,
        &request.selection,
        &snapshot.chains,
        request.hide_forks,
        &request.toggles,
    );
    let mut protocols = scoped.protocols;
    protocols.sort_by(|a, b| b.figures.tvl().cmp(&a.figures.tvl()));

    ProtocolsView {
        selected_chains: scoped.selected_chains,
        protocols,
        issues: scoped.issues,
    }
}

/// Recently listed protocols, newest first, with their listing age at `now`.
pub fn build_recent_protocols_view(
    snapshot: &Snapshot,
    request: &ProtocolsRequest,
    now: i64,
) -> ProtocolsView {
    let listed: Vec<_> = snapshot
        .protocols
        .iter()
        .filter(|p| p.listed_at.is_some())
        .cloned()
        .collect();
    let scoped = filter_protocols_by_chains(
        &listed,
        &request.selection,
        &snapshot.chains,
        request.hide_forks,
        &request.toggles,
    );

    ProtocolsView {
        selected_chains: scoped.selected_chains,
        protocols: order_by_listing_age(scoped.protocols, &listed, now),
        issues: scoped.issues,
    }
}
