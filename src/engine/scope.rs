//! Chain-scoped filtering and re-aggregation of protocols.

use super::normalize::{normalize_protocol, protocol_entity, ChainScope};
use crate::domain::{format_chain_label, ChainKey, Decimal, ExtraTvlToggleSet, ProtocolEntity, ProtocolRecord, SECONDS_IN_DAY};
use crate::error::EngineIssue;
use std::collections::BTreeSet;

/// Sentinel selecting every chain.
pub const SELECT_ALL: &str = "All";
/// Sentinel selecting no chain.
pub const SELECT_NONE: &str = "None";

/// Caller's chain selection before it is resolved against the page's chains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChainSelection {
    /// Nothing passed; behaves like `All`.
    #[default]
    Unspecified,
    All,
    None,
    Chains(Vec<String>),
}

impl ChainSelection {
    /// Parse a query value: `All`, `None`, or a comma-separated chain list.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return ChainSelection::Unspecified;
        };
        match raw {
            SELECT_ALL => ChainSelection::All,
            SELECT_NONE => ChainSelection::None,
            list => ChainSelection::Chains(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    /// Resolve to concrete chain labels.
    ///
    /// Requested chains take the page's spelling when they match one of its
    /// chains case-insensitively, and a formatted label otherwise.
    pub fn resolve(&self, all_chains: &[String]) -> Vec<String> {
        match self {
            ChainSelection::Unspecified | ChainSelection::All => all_chains.to_vec(),
            ChainSelection::None => Vec::new(),
            ChainSelection::Chains(chains) => chains
                .iter()
                .map(|requested| {
                    let key = ChainKey::new(requested);
                    all_chains
                        .iter()
                        .find(|c| ChainKey::new(c.as_str()) == key)
                        .cloned()
                        .unwrap_or_else(|| format_chain_label(requested))
                })
                .collect(),
        }
    }
}

/// Result of scoping protocols to a chain selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedProtocols {
    pub selected_chains: Vec<String>,
    pub protocols: Vec<ProtocolEntity>,
    pub issues: Vec<EngineIssue>,
}

/// Keep protocols deployed on a selected chain and recompute their figures
/// from the selected chains' sections only.
///
/// Input order is preserved. Fork protocols are dropped when `hide_forks` is set.
pub fn filter_protocols_by_chains(
    protocols: &[ProtocolRecord],
    selection: &ChainSelection,
    all_chains: &[String],
    hide_forks: bool,
    toggles: &ExtraTvlToggleSet,
) -> ScopedProtocols {
    let selected_chains = selection.resolve(all_chains);
    let selected: BTreeSet<ChainKey> = selected_chains.iter().map(ChainKey::from).collect();
    let scope = ChainScope::Only(selected.clone());

    let mut issues = Vec::new();
    let scoped: Vec<ProtocolEntity> = protocols
        .iter()
        .filter(|p| !(hide_forks && p.forked))
        .filter(|p| p.chain_keys().iter().any(|c| selected.contains(c)))
        .map(|p| {
            let normalized = normalize_protocol(p, toggles, false, &scope);
            issues.extend(normalized.issues);
            protocol_entity(p, normalized.entity, toggles)
        })
        .collect();

    tracing::debug!(
        selected = selected_chains.len(),
        kept = scoped.len(),
        total = protocols.len(),
        "Scoped protocols to chain selection"
    );

    ScopedProtocols {
        selected_chains,
        protocols: scoped,
        issues,
    }
}

/// Days between `listed_at` and `now` (both unix seconds), two decimals.
pub fn listed_days_ago(listed_at: i64, now: i64) -> Decimal {
    Decimal::from(now - listed_at)
        .checked_div(Decimal::from(SECONDS_IN_DAY))
        .unwrap_or_default()
        .round_dp(2)
}

/// Annotate listing age and order most recently listed first.
///
/// Protocols without a listing date sort last.
pub fn order_by_listing_age(mut protocols: Vec<ProtocolEntity>, records: &[ProtocolRecord], now: i64) -> Vec<ProtocolEntity> {
    for entity in &mut protocols {
        entity.listed_days_ago = records
            .iter()
            .find(|r| r.name == entity.name)
            .and_then(|r| r.listed_at)
            .map(|listed_at| listed_days_ago(listed_at, now));
    }
    protocols.sort_by(|a, b| match (a.listed_days_ago, b.listed_days_ago) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    protocols
}
