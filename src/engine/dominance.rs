//! Daily stacked series with extra-TVL rules and per-day dominance shares.

use crate::domain::series::BASE_TVL_FIELD;
use crate::domain::{DailyRow, DailyTvlPoint, Decimal, ExtraTvlToggleSet, Fold, StackedDay};
use std::collections::BTreeMap;

/// Both chart series derived from one stacked dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySeries {
    /// Per-entity values with extra-TVL rules applied.
    pub by_day: Vec<DailyRow>,
    /// Same days with values, totals and percentage shares.
    pub dominance_by_day: Vec<DailyTvlPoint>,
}

/// Resolve one entity's fields for a day into a single value.
///
/// `tvl` is the base; other fields are extra categories folded by the
/// toggle set with liquid staking and double counting applied.
pub fn resolve_day_value(fields: &BTreeMap<String, Decimal>, toggles: &ExtraTvlToggleSet) -> Decimal {
    let mut value = Decimal::zero();
    for (field, amount) in fields {
        if field == BASE_TVL_FIELD {
            value += *amount;
            continue;
        }
        match toggles.fold_for(field, true) {
            Some(Fold::Add) => value += *amount,
            Some(Fold::Subtract) => value = value - *amount,
            None => {}
        }
    }
    value
}

/// Shares of `total` per entity; every share is zero when the total is zero.
pub fn dominance_shares(values: &BTreeMap<String, Decimal>) -> (Decimal, BTreeMap<String, Decimal>) {
    let total: Decimal = values.values().sum();
    let shares = values
        .iter()
        .map(|(name, value)| {
            let share = value
                .checked_div(total)
                .and_then(|ratio| ratio.checked_mul(Decimal::hundred()))
                .unwrap_or_default();
            (name.clone(), share)
        })
        .collect();
    (total, shares)
}

/// Build per-day values and dominance from a stacked dataset.
///
/// Works on a copy sorted by date (stable), so the caller's rows are left as
/// they were. Entities absent on a day stay absent and do not count toward
/// that day's total.
pub fn build_daily_series(dataset: &[StackedDay], toggles: &ExtraTvlToggleSet) -> DailySeries {
    let mut days: Vec<&StackedDay> = dataset.iter().collect();
    days.sort_by_key(|day| day.date);

    let by_day: Vec<DailyRow> = days
        .iter()
        .map(|day| DailyRow {
            date: day.date,
            values: day
                .entities
                .iter()
                .map(|(name, fields)| (name.clone(), resolve_day_value(fields, toggles)))
                .collect(),
        })
        .collect();

    let dominance_by_day = by_day
        .iter()
        .map(|row| {
            let (total, dominance) = dominance_shares(&row.values);
            DailyTvlPoint {
                date: row.date,
                per_entity: row.values.clone(),
                total,
                dominance,
            }
        })
        .collect();

    tracing::debug!(days = by_day.len(), "Built daily series");

    DailySeries {
        by_day,
        dominance_by_day,
    }
}
