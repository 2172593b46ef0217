//! Extra-TVL normalization: one fold over typed contributions.
//!
//! Raw `chainTvls` sections are first classified into [`Contribution`]s, then
//! folded into period totals by the toggle set's accumulation rules. Both the
//! protocol and the chain normalizers go through [`fold_contributions`].

use super::change::{mcap_to_tvl, period_changes};
use crate::domain::toggles::{DOUBLE_COUNTED, LIQUID_STAKING};
use crate::domain::{
    classify_section, AggregatedEntity, ChainEntity, ChainKey, ChainRecord, Decimal,
    ExtraTvlToggleSet, Fold, PeriodTotals, ProtocolEntity, ProtocolRecord, SectionKind, TvlSeries,
};
use crate::error::EngineIssue;
use std::collections::{BTreeMap, BTreeSet};

/// A single typed input to the fold.
#[derive(Debug, Clone, Copy)]
pub enum Contribution<'a> {
    /// Base TVL, always counted.
    Base(&'a TvlSeries),
    /// Extra-category TVL, counted per the toggle set.
    Extra {
        category: &'a str,
        series: &'a TvlSeries,
    },
}

/// Which chains of a protocol count toward its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainScope {
    /// Every declared chain plus chain-less extra sections.
    Unscoped,
    /// Only sections on these chains.
    Only(BTreeSet<ChainKey>),
}

impl ChainScope {
    pub fn only<I, S>(chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ChainScope::Only(chains.into_iter().map(|c| ChainKey::new(c.as_ref())).collect())
    }

    fn includes(&self, chain: &ChainKey) -> bool {
        match self {
            ChainScope::Unscoped => true,
            ChainScope::Only(set) => set.contains(chain),
        }
    }

    /// Chain-less sections only belong to a scope covering every declared chain.
    fn includes_chainless(&self, declared: &[ChainKey]) -> bool {
        match self {
            ChainScope::Unscoped => true,
            ChainScope::Only(set) => declared.iter().all(|c| set.contains(c)),
        }
    }
}

/// Normalized figures plus the diagnostics raised while producing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub entity: AggregatedEntity,
    pub contributing_sections: usize,
    pub issues: Vec<EngineIssue>,
}

#[derive(Debug, Default)]
struct TotalsAccumulator {
    tvl: Option<Decimal>,
    prev_day: Option<Decimal>,
    prev_week: Option<Decimal>,
    prev_month: Option<Decimal>,
}

impl TotalsAccumulator {
    fn apply(&mut self, series: &TvlSeries, fold: Fold) {
        fn step(acc: &mut Option<Decimal>, value: Option<Decimal>, fold: Fold) {
            if let Some(v) = value {
                let base = acc.unwrap_or_default();
                *acc = Some(match fold {
                    Fold::Add => base + v,
                    Fold::Subtract => base - v,
                });
            }
        }

        step(&mut self.tvl, Some(series.tvl), fold);
        step(&mut self.prev_day, series.tvl_prev_day, fold);
        step(&mut self.prev_week, series.tvl_prev_week, fold);
        step(&mut self.prev_month, series.tvl_prev_month, fold);
    }

    fn finish(self) -> PeriodTotals {
        PeriodTotals {
            tvl: self.tvl.unwrap_or_default(),
            tvl_prev_day: self.prev_day,
            tvl_prev_week: self.prev_week,
            tvl_prev_month: self.prev_month,
        }
    }
}

/// Fold contributions into totals, changes and the extra-TVL breakdown.
///
/// Extra categories are always recorded in `extra_tvl`; they move the totals
/// only when [`ExtraTvlToggleSet::fold_for`] says so.
pub fn fold_contributions<'a, I>(
    contributions: I,
    toggles: &ExtraTvlToggleSet,
    apply_liquid_and_double_count: bool,
) -> AggregatedEntity
where
    I: IntoIterator<Item = Contribution<'a>>,
{
    let mut acc = TotalsAccumulator::default();
    let mut extra_tvl: BTreeMap<String, Decimal> = BTreeMap::new();

    for contribution in contributions {
        match contribution {
            Contribution::Base(series) => acc.apply(series, Fold::Add),
            Contribution::Extra { category, series } => {
                *extra_tvl.entry(category.to_string()).or_default() += series.tvl;
                if let Some(fold) = toggles.fold_for(category, apply_liquid_and_double_count) {
                    acc.apply(series, fold);
                }
            }
        }
    }

    let totals = acc.finish();
    let changes = period_changes(&totals);
    AggregatedEntity {
        totals,
        changes,
        extra_tvl,
    }
}

/// Normalize a protocol's `chainTvls` within `scope`.
///
/// A chain-less extra section is skipped when the same category is also
/// reported per chain, since upstream sends both the per-chain split and its
/// sum.
pub fn normalize_protocol(
    record: &ProtocolRecord,
    toggles: &ExtraTvlToggleSet,
    apply_liquid_and_double_count: bool,
    scope: &ChainScope,
) -> Normalized {
    let declared = record.chain_keys();
    let mut issues = Vec::new();

    let classified: Vec<(SectionKind, TvlSeries)> = record
        .chain_tvls
        .iter()
        .filter_map(|(key, value)| {
            let kind = classify_section(key, &declared);
            if kind == SectionKind::Malformed {
                tracing::warn!(protocol = %record.name, key = %key, "Unresolved section key");
                issues.push(EngineIssue::MalformedKey {
                    entity: record.name.clone(),
                    key: key.clone(),
                });
                None
            } else {
                Some((kind, value.to_series()))
            }
        })
        .collect();

    let per_chain_categories: BTreeSet<&str> = classified
        .iter()
        .filter_map(|(kind, _)| match kind {
            SectionKind::ChainExtra { category, .. } => Some(category.as_str()),
            _ => None,
        })
        .collect();
    let chainless_in_scope = scope.includes_chainless(&declared);

    let contributions: Vec<Contribution<'_>> = classified
        .iter()
        .filter_map(|(kind, series)| match kind {
            SectionKind::Chain { chain } if scope.includes(chain) => {
                Some(Contribution::Base(series))
            }
            SectionKind::ChainExtra { chain, category } if scope.includes(chain) => {
                Some(Contribution::Extra { category, series })
            }
            SectionKind::GlobalExtra { category }
                if chainless_in_scope && !per_chain_categories.contains(category.as_str()) =>
            {
                Some(Contribution::Extra { category, series })
            }
            _ => None,
        })
        .collect();

    let contributing_sections = contributions.len();
    if contributing_sections == 0 {
        tracing::debug!(protocol = %record.name, "No sections in scope");
        issues.push(EngineIssue::MissingData {
            entity: record.name.clone(),
        });
    }

    Normalized {
        entity: fold_contributions(contributions, toggles, apply_liquid_and_double_count),
        contributing_sections,
        issues,
    }
}

/// Why a protocol is shown struck through, if it is.
///
/// Double-counted and liquid-staking protocols are struck when the matching
/// toggle is OFF.
pub fn strike_reason(record: &ProtocolRecord, toggles: &ExtraTvlToggleSet) -> Option<String> {
    let double_counted = record.doublecounted && !toggles.is_enabled(DOUBLE_COUNTED);
    let liquid_staking = record.is_liquid_staking() && !toggles.is_enabled(LIQUID_STAKING);

    match (double_counted, liquid_staking) {
        (true, true) => Some(
            "Deposits into another protocol or is liquid staking; excluded from totals while both Double Count and Liquid Staking are off"
                .to_string(),
        ),
        (true, false) => Some(
            "Deposits into another protocol; excluded from totals while Double Count is off"
                .to_string(),
        ),
        (false, true) => {
            Some("Liquid staking protocol; excluded from totals while Liquid Staking is off".to_string())
        }
        (false, false) => None,
    }
}

/// Build a protocol row from its record and normalized figures.
pub fn protocol_entity(
    record: &ProtocolRecord,
    figures: AggregatedEntity,
    toggles: &ExtraTvlToggleSet,
) -> ProtocolEntity {
    let strike_reason = strike_reason(record, toggles);
    let mcaptvl = mcap_to_tvl(record.mcap, figures.tvl());
    ProtocolEntity {
        name: record.name.clone(),
        chains: record.chains.clone(),
        category: record.category.clone(),
        figures,
        mcap: record.mcap,
        mcaptvl,
        listed_days_ago: None,
        strike_tvl: strike_reason.is_some(),
        strike_reason,
    }
}

/// Normalize a chain record; its base series always counts.
pub fn normalize_chain(
    record: &ChainRecord,
    toggles: &ExtraTvlToggleSet,
    apply_liquid_and_double_count: bool,
) -> ChainEntity {
    let contributions = std::iter::once(Contribution::Base(&record.base)).chain(
        record
            .extra_tvl
            .iter()
            .map(|(category, series)| Contribution::Extra { category, series }),
    );
    let figures = fold_contributions(contributions, toggles, apply_liquid_and_double_count);
    let mcaptvl = mcap_to_tvl(record.mcap, figures.tvl());

    ChainEntity {
        name: record.name.clone(),
        figures,
        protocols: record.protocols,
        mcap: record.mcap,
        mcaptvl,
        members: vec![record.name.clone()],
        sub_rows: Vec::new(),
    }
}

/// Normalize every chain record, ordered by TVL descending (ties keep input order).
pub fn normalize_chains(
    records: &[ChainRecord],
    toggles: &ExtraTvlToggleSet,
    apply_liquid_and_double_count: bool,
) -> Vec<ChainEntity> {
    let mut chains: Vec<ChainEntity> = records
        .iter()
        .map(|r| normalize_chain(r, toggles, apply_liquid_and_double_count))
        .collect();
    chains.sort_by(|a, b| b.figures.tvl().cmp(&a.figures.tvl()));
    chains
}
