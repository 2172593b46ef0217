//! Daily stacked datasets and rank buckets.

use super::primitives::DaySecs;
use super::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the base TVL inside a stacked entity value.
pub const BASE_TVL_FIELD: &str = "tvl";

/// One raw day of a stacked dataset: per entity, the base `tvl` plus any
/// extra-category amounts (`{"Ethereum": {"tvl": 10, "staking": 2}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackedDay {
    pub date: DaySecs,
    #[serde(flatten)]
    pub entities: BTreeMap<String, BTreeMap<String, Decimal>>,
}

impl StackedDay {
    pub fn new(date: i64) -> Self {
        Self {
            date: DaySecs::new(date),
            entities: BTreeMap::new(),
        }
    }

    pub fn with_entity(mut self, name: &str, fields: &[(&str, Decimal)]) -> Self {
        self.entities.insert(
            name.to_string(),
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        );
        self
    }
}

/// One day with a single resolved value per entity present that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: DaySecs,
    #[serde(flatten)]
    pub values: BTreeMap<String, Decimal>,
}

/// One day of per-entity values, their total and each entity's share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTvlPoint {
    pub date: DaySecs,
    pub per_entity: BTreeMap<String, Decimal>,
    pub total: Decimal,
    /// Percentage of `total`, 0..=100 for non-negative inputs.
    pub dominance: BTreeMap<String, Decimal>,
}

/// A labelled value for ranking and pie-style views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub tvl: Decimal,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, tvl: Decimal) -> Self {
        Self {
            name: name.into(),
            tvl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty_epoch_days() {
        assert_eq!(StackedDay::default(), StackedDay::new(0));
        assert!(DailyRow::default().values.is_empty());
        let point = DailyTvlPoint::default();
        assert_eq!(point.date, DaySecs::new(0));
        assert!(point.total.is_zero());
    }

    #[test]
    fn test_stacked_day_deserializes_flat_entities() {
        let raw = r#"{"date": 1000, "Ethereum": {"tvl": 10, "staking": 2}, "Polygon": {"tvl": 5}}"#;
        let day: StackedDay = serde_json::from_str(raw).unwrap();
        assert_eq!(day.date, DaySecs::new(1000));
        assert_eq!(day.entities.len(), 2);
        assert_eq!(day.entities["Ethereum"]["staking"], Decimal::from(2));
    }

    #[test]
    fn test_daily_row_serializes_flat() {
        let mut row = DailyRow {
            date: DaySecs::new(1000),
            values: BTreeMap::new(),
        };
        row.values.insert("A".to_string(), Decimal::from(15));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["date"], 1000);
        assert!(json["A"].is_number());
    }
}
