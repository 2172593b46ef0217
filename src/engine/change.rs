//! Percent-change math with null and zero guards.

use crate::domain::{Decimal, PercentChanges, PeriodTotals};

/// `((current - previous) / previous) * 100`, unrounded.
///
/// `None` when there is no previous value, it is zero, or the result does not
/// fit in a `Decimal`.
pub fn percent_change(current: Decimal, previous: Option<Decimal>) -> Option<Decimal> {
    let previous = previous?;
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::hundred())
}

/// Day, week and month changes of a set of totals.
pub fn period_changes(totals: &PeriodTotals) -> PercentChanges {
    PercentChanges {
        change_1d: percent_change(totals.tvl, totals.tvl_prev_day),
        change_7d: percent_change(totals.tvl, totals.tvl_prev_week),
        change_1m: percent_change(totals.tvl, totals.tvl_prev_month),
    }
}

/// Market cap over TVL; `None` without a market cap or with zero TVL.
pub fn mcap_to_tvl(mcap: Option<Decimal>, tvl: Decimal) -> Option<Decimal> {
    mcap?.checked_div(tvl)
}
