//! Domain types for TVL aggregation.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Raw upstream records (protocols, chains, stacked daily datasets)
//! - The extra-TVL toggle set and per-category accumulation rules
//! - Normalized output records consumed by tables, charts and exports

pub mod decimal;
pub mod entity;
pub mod primitives;
pub mod protocol;
pub mod series;
pub mod snapshot;
pub mod toggles;

pub use decimal::Decimal;
pub use entity::{AggregatedEntity, ChainEntity, PercentChanges, PeriodTotals, ProtocolEntity};
pub use primitives::{format_chain_label, ChainKey, DaySecs, SECONDS_IN_DAY};
pub use protocol::{classify_section, ChainRecord, ProtocolRecord, SectionKind, SectionValue, TvlSeries};
pub use series::{DailyRow, DailyTvlPoint, NamedValue, StackedDay};
pub use snapshot::{ChainGroup, Snapshot};
pub use toggles::{AccumulationRule, ExtraTvlToggleSet, Fold};
