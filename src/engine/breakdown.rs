//! Single-protocol breakdown for detail views.

use super::normalize::{normalize_protocol, protocol_entity, ChainScope};
use crate::domain::{
    classify_section, ExtraTvlToggleSet, NamedValue, ProtocolEntity, ProtocolRecord, SectionKind,
};
use crate::error::EngineIssue;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolBreakdown {
    #[serde(flatten)]
    pub protocol: ProtocolEntity,
    /// Base TVL per declared chain, largest first.
    pub tvl_by_chain: Vec<NamedValue>,
    /// Extra categories present in the record.
    pub extra_categories: Vec<String>,
    /// Present categories whose toggle is OFF.
    pub hidden_categories: Vec<String>,
    pub issues: Vec<EngineIssue>,
}

pub fn protocol_breakdown(record: &ProtocolRecord, toggles: &ExtraTvlToggleSet) -> ProtocolBreakdown {
    let normalized = normalize_protocol(record, toggles, false, &ChainScope::Unscoped);
    let declared = record.chain_keys();

    let mut tvl_by_chain: Vec<NamedValue> = Vec::new();
    let mut extra_categories: BTreeSet<String> = BTreeSet::new();
    for (key, value) in &record.chain_tvls {
        match classify_section(key, &declared) {
            SectionKind::Chain { .. } => tvl_by_chain.push(NamedValue::new(key.clone(), value.tvl())),
            SectionKind::ChainExtra { category, .. } | SectionKind::GlobalExtra { category } => {
                extra_categories.insert(category);
            }
            SectionKind::Malformed => {}
        }
    }
    tvl_by_chain.sort_by(|a, b| b.tvl.cmp(&a.tvl));

    let hidden_categories = extra_categories
        .iter()
        .filter(|c| !toggles.is_enabled(c))
        .cloned()
        .collect();

    ProtocolBreakdown {
        protocol: protocol_entity(record, normalized.entity, toggles),
        tvl_by_chain,
        extra_categories: extra_categories.into_iter().collect(),
        hidden_categories,
        issues: normalized.issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, TvlSeries};

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_breakdown() {
        let record = ProtocolRecord::new("P", vec!["Ethereum".to_string(), "Polygon".to_string()])
            .with_section("Ethereum", TvlSeries::current(d(100)))
            .with_section("Polygon", TvlSeries::current(d(150)))
            .with_section("Ethereum-staking", d(30))
            .with_section("pool2", d(4));
        let toggles = ExtraTvlToggleSet::with_enabled(["pool2"]);
        let breakdown = protocol_breakdown(&record, &toggles);

        assert_eq!(breakdown.protocol.figures.tvl(), d(254));
        assert_eq!(breakdown.tvl_by_chain[0].name, "Polygon");
        assert_eq!(breakdown.tvl_by_chain.len(), 2);
        assert_eq!(breakdown.extra_categories, vec!["pool2", "staking"]);
        assert_eq!(breakdown.hidden_categories, vec!["staking"]);
        assert!(breakdown.issues.is_empty());
    }
}
