//! Domain primitives: DaySecs, ChainKey and chain label helpers.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Seconds in one day.
pub const SECONDS_IN_DAY: i64 = 86_400;

/// Unix timestamp in seconds, bucketed to a day by the upstream provider.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DaySecs(pub i64);

impl DaySecs {
    pub fn new(secs: i64) -> Self {
        DaySecs(secs)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// `MM/DD/YYYY` in UTC, the date column of CSV exports.
    ///
    /// Out-of-range timestamps render as an empty string.
    pub fn to_csv_date(&self) -> String {
        match Utc.timestamp_opt(self.0, 0).single() {
            Some(dt) => dt.format("%m/%d/%Y").to_string(),
            None => String::new(),
        }
    }
}

impl std::fmt::Display for DaySecs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case-normalized chain name used for all chain lookups.
///
/// Labels keep the caller's casing; only comparisons go through this key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainKey(String);

impl ChainKey {
    pub fn new(name: &str) -> Self {
        ChainKey(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainKey {
    fn from(name: &str) -> Self {
        ChainKey::new(name)
    }
}

impl From<&String> for ChainKey {
    fn from(name: &String) -> Self {
        ChainKey::new(name)
    }
}

/// Display label for a raw chain identifier (`avax` -> `Avalanche`, `bsc` -> `BSC`).
pub fn format_chain_label(chain: &str) -> String {
    if chain.is_empty() {
        return String::new();
    }

    let lower = chain.to_lowercase();
    match lower.as_str() {
        "avax" | "avalanche" => "Avalanche".to_string(),
        "bsc" => "BSC".to_string(),
        "xdai" => "xDai".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_secs_default_is_epoch() {
        assert_eq!(DaySecs::default().as_i64(), 0);
        assert_eq!(DaySecs::default().to_csv_date(), "01/01/1970");
    }

    #[test]
    fn test_chain_key_is_case_insensitive() {
        assert_eq!(ChainKey::new("Ethereum"), ChainKey::new("ETHEREUM"));
        assert_eq!(ChainKey::new(" Polygon "), ChainKey::new("polygon"));
        assert_ne!(ChainKey::new("Polygon"), ChainKey::new("PolygonZkEvm"));
    }

    #[test]
    fn test_format_chain_label() {
        assert_eq!(format_chain_label("avax"), "Avalanche");
        assert_eq!(format_chain_label("BSC"), "BSC");
        assert_eq!(format_chain_label("bsc"), "BSC");
        assert_eq!(format_chain_label("xdai"), "xDai");
        assert_eq!(format_chain_label("ethereum"), "Ethereum");
        assert_eq!(format_chain_label(""), "");
    }

    #[test]
    fn test_csv_date_is_month_day_year() {
        // 2023-01-02T00:00:00Z
        assert_eq!(DaySecs::new(1_672_617_600).to_csv_date(), "01/02/2023");
    }

    #[test]
    fn test_day_ordering() {
        assert!(DaySecs::new(1) < DaySecs::new(SECONDS_IN_DAY));
    }
}
