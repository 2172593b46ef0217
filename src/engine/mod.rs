//! Pure, synchronous transforms over an in-memory TVL snapshot.
//!
//! Nothing here performs I/O or keeps state between calls; the toggle set and
//! chain selection are passed explicitly into every function.

pub mod breakdown;
pub mod change;
pub mod dominance;
pub mod export;
pub mod fingerprint;
pub mod group;
pub mod normalize;
pub mod rank;
pub mod scope;

pub use breakdown::{protocol_breakdown, ProtocolBreakdown};
pub use change::{mcap_to_tvl, percent_change, period_changes};
pub use dominance::{build_daily_series, dominance_shares, resolve_day_value, DailySeries};
pub use export::{csv_filename, daily_rows_to_csv, ExportError};
pub use fingerprint::{fingerprint, fingerprint_bytes};
pub use group::group_chains_by_parent;
pub use normalize::{
    fold_contributions, normalize_chain, normalize_chains, normalize_protocol, protocol_entity,
    strike_reason, ChainScope, Contribution, Normalized,
};
pub use rank::{summarize_top, DEFAULT_KEEP_COUNT, OTHERS_LABEL};
pub use scope::{
    filter_protocols_by_chains, listed_days_ago, order_by_listing_age, ChainSelection,
    ScopedProtocols,
};
