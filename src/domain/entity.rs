//! Normalized output records.

use super::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Headline total and prior-period totals of one entity.
///
/// Prior periods stay `None` until a section supplies a value, so "no data"
/// is never confused with "zero".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub tvl: Decimal,
    pub tvl_prev_day: Option<Decimal>,
    pub tvl_prev_week: Option<Decimal>,
    pub tvl_prev_month: Option<Decimal>,
}

impl PeriodTotals {
    /// Sum of two totals; a prior period is `None` only if both sides are.
    pub fn merged(&self, other: &PeriodTotals) -> PeriodTotals {
        fn add_opt(a: Option<Decimal>, b: Option<Decimal>) -> Option<Decimal> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or_default() + b.unwrap_or_default()),
            }
        }

        PeriodTotals {
            tvl: self.tvl + other.tvl,
            tvl_prev_day: add_opt(self.tvl_prev_day, other.tvl_prev_day),
            tvl_prev_week: add_opt(self.tvl_prev_week, other.tvl_prev_week),
            tvl_prev_month: add_opt(self.tvl_prev_month, other.tvl_prev_month),
        }
    }
}

/// Day/week/month percent changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentChanges {
    #[serde(rename = "change_1d")]
    pub change_1d: Option<Decimal>,
    #[serde(rename = "change_7d")]
    pub change_7d: Option<Decimal>,
    #[serde(rename = "change_1m")]
    pub change_1m: Option<Decimal>,
}

/// Normalized figures for a protocol or chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEntity {
    #[serde(flatten)]
    pub totals: PeriodTotals,
    #[serde(flatten)]
    pub changes: PercentChanges,
    /// Every extra category's value, whether or not it was folded into `tvl`.
    pub extra_tvl: BTreeMap<String, Decimal>,
}

impl AggregatedEntity {
    pub fn tvl(&self) -> Decimal {
        self.totals.tvl
    }
}

/// A normalized protocol row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolEntity {
    pub name: String,
    pub chains: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub figures: AggregatedEntity,
    pub mcap: Option<Decimal>,
    /// Market cap over TVL.
    pub mcaptvl: Option<Decimal>,
    /// Days since listing, for recently-listed views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listed_days_ago: Option<Decimal>,
    pub strike_tvl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_reason: Option<String>,
}

/// A normalized chain row, optionally carrying grouped child rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntity {
    pub name: String,
    #[serde(flatten)]
    pub figures: AggregatedEntity,
    pub protocols: u32,
    pub mcap: Option<Decimal>,
    pub mcaptvl: Option<Decimal>,
    /// Chains folded into this row; just the chain itself when ungrouped.
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sub_rows: Vec<ChainEntity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_keeps_none_only_when_both_none() {
        let a = PeriodTotals {
            tvl: Decimal::from(10),
            tvl_prev_day: Some(Decimal::from(5)),
            tvl_prev_week: None,
            tvl_prev_month: None,
        };
        let b = PeriodTotals {
            tvl: Decimal::from(20),
            tvl_prev_day: None,
            tvl_prev_week: Some(Decimal::from(7)),
            tvl_prev_month: None,
        };
        let merged = a.merged(&b);
        assert_eq!(merged.tvl, Decimal::from(30));
        assert_eq!(merged.tvl_prev_day, Some(Decimal::from(5)));
        assert_eq!(merged.tvl_prev_week, Some(Decimal::from(7)));
        assert_eq!(merged.tvl_prev_month, None);
    }

    #[test]
    fn test_entity_serializes_upstream_change_names() {
        let entity = AggregatedEntity::default();
        let json = serde_json::to_value(&entity).unwrap();
        assert!(json.get("change_1d").is_some());
        assert!(json.get("tvlPrevDay").is_some());
        assert!(json.get("extraTvl").is_some());
        assert!(json["change_7d"].is_null());
    }
}
