//! The in-memory snapshot handed over by the upstream data provider.

use super::protocol::{ChainRecord, ProtocolRecord};
use super::series::StackedDay;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Category value that means "no category restriction".
pub const ALL_CATEGORY: &str = "All";

/// A parent ecosystem and the chains folded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainGroup {
    pub parent_name: String,
    pub child_names: BTreeSet<String>,
}

impl ChainGroup {
    pub fn new<I, S>(parent: &str, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent_name: parent.to_string(),
            child_names: children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the engine needs for one render/request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All chains known to the protocols views, in display order.
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub protocols: Vec<ProtocolRecord>,
    #[serde(default)]
    pub chain_tvls: Vec<ChainRecord>,
    #[serde(default)]
    pub stacked_dataset: Vec<StackedDay>,
    #[serde(default)]
    pub chain_groups: Vec<ChainGroup>,
    /// Chain category -> member chains.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    /// Fork registry: protocol name -> is a fork.
    #[serde(default)]
    pub forks: BTreeMap<String, bool>,
}

impl Snapshot {
    /// Copy fork flags from the registry onto protocol records.
    pub fn apply_fork_registry(&mut self) {
        for protocol in &mut self.protocols {
            if self.forks.get(&protocol.name).copied().unwrap_or(false) {
                protocol.forked = true;
            }
        }
    }

    /// Chains belonging to `category`, or `None` when every chain qualifies.
    pub fn chains_in_category(&self, category: &str) -> Option<BTreeSet<String>> {
        if category == ALL_CATEGORY {
            return None;
        }
        Some(
            self.categories
                .get(category)
                .map(|chains| chains.iter().map(|c| c.to_lowercase()).collect())
                .unwrap_or_default(),
        )
    }

    pub fn find_protocol(&self, name: &str) -> Option<&ProtocolRecord> {
        self.protocols
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fork_registry() {
        let mut snapshot = Snapshot {
            protocols: vec![
                ProtocolRecord::new("Uniswap", vec!["Ethereum".to_string()]),
                ProtocolRecord::new("SushiSwap", vec!["Ethereum".to_string()]),
            ],
            ..Default::default()
        };
        snapshot.forks.insert("SushiSwap".to_string(), true);
        snapshot.apply_fork_registry();
        assert!(!snapshot.protocols[0].forked);
        assert!(snapshot.protocols[1].forked);
    }

    #[test]
    fn test_chains_in_category() {
        let mut snapshot = Snapshot::default();
        snapshot
            .categories
            .insert("EVM".to_string(), vec!["Ethereum".to_string()]);
        assert!(snapshot.chains_in_category("All").is_none());
        assert!(snapshot.chains_in_category("EVM").unwrap().contains("ethereum"));
        assert!(snapshot.chains_in_category("Unknown").unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_with_defaults() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"chains": ["Ethereum"]}"#).unwrap();
        assert_eq!(snapshot.chains, vec!["Ethereum".to_string()]);
        assert!(snapshot.protocols.is_empty());
    }
}
