//! Raw protocol and chain records as supplied by the upstream provider.

use super::primitives::ChainKey;
use super::toggles::category_key;
use super::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between chain and category in composite section keys.
pub const SECTION_DELIMITER: char = '-';

/// Current value plus optional prior-period values of one TVL section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvlSeries {
    #[serde(default)]
    pub tvl: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl_prev_day: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl_prev_week: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvl_prev_month: Option<Decimal>,
}

impl TvlSeries {
    /// A series with only a current value.
    pub fn current(tvl: Decimal) -> Self {
        Self {
            tvl,
            ..Default::default()
        }
    }

    pub fn with_history(
        tvl: Decimal,
        prev_day: Option<Decimal>,
        prev_week: Option<Decimal>,
        prev_month: Option<Decimal>,
    ) -> Self {
        Self {
            tvl,
            tvl_prev_day: prev_day,
            tvl_prev_week: prev_week,
            tvl_prev_month: prev_month,
        }
    }
}

/// A section value: a full series for chain sections, a bare number for pure
/// extra-category sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Scalar(Decimal),
    Series(TvlSeries),
}

impl SectionValue {
    pub fn to_series(&self) -> TvlSeries {
        match self {
            SectionValue::Scalar(v) => TvlSeries::current(*v),
            SectionValue::Series(s) => s.clone(),
        }
    }

    pub fn tvl(&self) -> Decimal {
        match self {
            SectionValue::Scalar(v) => *v,
            SectionValue::Series(s) => s.tvl,
        }
    }
}

impl From<TvlSeries> for SectionValue {
    fn from(series: TvlSeries) -> Self {
        SectionValue::Series(series)
    }
}

impl From<Decimal> for SectionValue {
    fn from(value: Decimal) -> Self {
        SectionValue::Scalar(value)
    }
}

/// One DeFi protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRecord {
    pub name: String,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub chain_tvls: BTreeMap<String, SectionValue>,
    #[serde(default)]
    pub listed_at: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    /// Set from the fork registry when the snapshot is assembled.
    #[serde(default)]
    pub forked: bool,
    /// Deposits into other protocols (counted twice in aggregate views).
    #[serde(default)]
    pub doublecounted: bool,
    #[serde(default)]
    pub mcap: Option<Decimal>,
}

impl ProtocolRecord {
    pub fn new(name: impl Into<String>, chains: Vec<String>) -> Self {
        Self {
            name: name.into(),
            chains,
            chain_tvls: BTreeMap::new(),
            listed_at: None,
            category: None,
            forked: false,
            doublecounted: false,
            mcap: None,
        }
    }

    pub fn with_section(mut self, key: impl Into<String>, value: impl Into<SectionValue>) -> Self {
        self.chain_tvls.insert(key.into(), value.into());
        self
    }

    pub fn chain_keys(&self) -> Vec<ChainKey> {
        self.chains.iter().map(ChainKey::from).collect()
    }

    pub fn is_liquid_staking(&self) -> bool {
        self.category.as_deref() == Some(super::toggles::LIQUID_STAKING_CATEGORY)
    }
}

/// One chain as delivered for chain-level views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    pub name: String,
    #[serde(flatten)]
    pub base: TvlSeries,
    /// Extra-TVL amounts attributed to this chain, by category.
    #[serde(default)]
    pub extra_tvl: BTreeMap<String, TvlSeries>,
    #[serde(default)]
    pub protocols: u32,
    #[serde(default)]
    pub mcap: Option<Decimal>,
}

impl ChainRecord {
    pub fn new(name: impl Into<String>, base: TvlSeries) -> Self {
        Self {
            name: name.into(),
            base,
            extra_tvl: BTreeMap::new(),
            protocols: 0,
            mcap: None,
        }
    }

    pub fn with_extra(mut self, category: &str, series: TvlSeries) -> Self {
        self.extra_tvl.insert(category_key(category), series);
        self
    }
}

/// How a section key of a protocol's `chainTvls` resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// Base TVL on a declared chain.
    Chain { chain: ChainKey },
    /// Extra category scoped to a declared chain (`"Ethereum-staking"`).
    ChainExtra { chain: ChainKey, category: String },
    /// Extra category with no chain (`"staking"`).
    GlobalExtra { category: String },
    /// Does not resolve against the declared chains.
    Malformed,
}

/// Classify a section key against the protocol's declared chains.
///
/// Composite keys split on the last delimiter and the chain part is looked up
/// exactly (case-normalized), so `PolygonZkEvm-staking` never resolves to
/// `Polygon`. Bare keys starting with a lower-case letter are global extra
/// categories; any other bare key must name a declared chain.
pub fn classify_section(key: &str, declared: &[ChainKey]) -> SectionKind {
    let whole = ChainKey::new(key);
    if declared.contains(&whole) {
        return SectionKind::Chain { chain: whole };
    }

    if let Some((chain_part, category)) = key.rsplit_once(SECTION_DELIMITER) {
        let chain = ChainKey::new(chain_part);
        if !category.trim().is_empty() && declared.contains(&chain) {
            return SectionKind::ChainExtra {
                chain,
                category: category_key(category),
            };
        }
        return SectionKind::Malformed;
    }

    match key.chars().next() {
        Some(c) if c.is_lowercase() => SectionKind::GlobalExtra {
            category: category_key(key),
        },
        _ => SectionKind::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> Vec<ChainKey> {
        names.iter().map(|n| ChainKey::new(n)).collect()
    }

    #[test]
    fn test_classify_chain_and_composite() {
        let chains = declared(&["Ethereum", "Polygon"]);
        assert_eq!(
            classify_section("ethereum", &chains),
            SectionKind::Chain {
                chain: ChainKey::new("Ethereum")
            }
        );
        assert_eq!(
            classify_section("Ethereum-staking", &chains),
            SectionKind::ChainExtra {
                chain: ChainKey::new("Ethereum"),
                category: "staking".to_string()
            }
        );
    }

    #[test]
    fn test_classify_global_extra() {
        let chains = declared(&["Ethereum"]);
        assert_eq!(
            classify_section("pool2", &chains),
            SectionKind::GlobalExtra {
                category: "pool2".to_string()
            }
        );
    }

    #[test]
    fn test_classify_shared_prefix_is_not_matched() {
        let chains = declared(&["Polygon"]);
        assert_eq!(
            classify_section("PolygonZkEvm-staking", &chains),
            SectionKind::Malformed
        );
        assert_eq!(classify_section("PolygonZkEvm", &chains), SectionKind::Malformed);
    }

    #[test]
    fn test_classify_hyphenated_chain_name() {
        let chains = declared(&["Harmony-One"]);
        assert_eq!(
            classify_section("Harmony-One-pool2", &chains),
            SectionKind::ChainExtra {
                chain: ChainKey::new("Harmony-One"),
                category: "pool2".to_string()
            }
        );
        assert_eq!(
            classify_section("Harmony-One", &chains),
            SectionKind::Chain {
                chain: ChainKey::new("Harmony-One")
            }
        );
    }

    #[test]
    fn test_section_value_deserializes_both_shapes() {
        let raw = r#"{"Ethereum": {"tvl": 100, "tvlPrevDay": 90}, "staking": 30}"#;
        let sections: BTreeMap<String, SectionValue> = serde_json::from_str(raw).unwrap();
        assert!(matches!(sections["Ethereum"], SectionValue::Series(_)));
        assert!(matches!(sections["staking"], SectionValue::Scalar(_)));
        assert_eq!(
            sections["Ethereum"].to_series().tvl_prev_day,
            Some(Decimal::from(90))
        );
    }
}
