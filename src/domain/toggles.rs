//! Extra-TVL categories, their accumulation rules and the toggle set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deposits already counted by another protocol.
pub const DOUBLE_COUNTED: &str = "doublecounted";
/// Liquid staking deposits.
pub const LIQUID_STAKING: &str = "liquidstaking";

/// Protocol category that marks a protocol as liquid staking.
pub const LIQUID_STAKING_CATEGORY: &str = "Liquid Staking";

/// How an extra-TVL category folds into a headline total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulationRule {
    /// Added when the toggle is ON, ignored when OFF.
    Additive,
    /// Already inside the base total; removed when the toggle is OFF.
    Subtractive,
}

impl AccumulationRule {
    /// Rule for a (lower-case) category name.
    pub fn for_category(category: &str) -> Self {
        match category {
            DOUBLE_COUNTED | LIQUID_STAKING => AccumulationRule::Subtractive,
            _ => AccumulationRule::Additive,
        }
    }
}

/// Direction a category's value moves the base total, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    Add,
    Subtract,
}

/// Normalizes a raw category label to its lookup form.
pub fn category_key(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Enabled/disabled state of every extra-TVL category for one invocation.
///
/// Categories not present are OFF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTvlToggleSet {
    enabled: BTreeMap<String, bool>,
}

impl ExtraTvlToggleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle set with exactly the given categories ON.
    pub fn with_enabled<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for category in categories {
            set.set(category.as_ref(), true);
        }
        set
    }

    /// Parse a comma-separated list of enabled categories (`"staking,pool2"`).
    pub fn parse_enabled_list(list: &str) -> Self {
        Self::with_enabled(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn set(&mut self, category: &str, on: bool) {
        self.enabled.insert(category_key(category), on);
    }

    pub fn is_enabled(&self, category: &str) -> bool {
        self.enabled
            .get(&category_key(category))
            .copied()
            .unwrap_or(false)
    }

    /// Enabled categories in lexical order.
    pub fn enabled_categories(&self) -> Vec<&str> {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Decide how `category` folds into a total under this toggle set.
    ///
    /// With `apply_liquid_and_double_count` false, subtractive categories never
    /// move the total.
    pub fn fold_for(&self, category: &str, apply_liquid_and_double_count: bool) -> Option<Fold> {
        let key = category_key(category);
        let on = self.is_enabled(&key);
        match AccumulationRule::for_category(&key) {
            AccumulationRule::Additive if on => Some(Fold::Add),
            AccumulationRule::Subtractive if !on && apply_liquid_and_double_count => {
                Some(Fold::Subtract)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules() {
        assert_eq!(
            AccumulationRule::for_category("doublecounted"),
            AccumulationRule::Subtractive
        );
        assert_eq!(
            AccumulationRule::for_category("liquidstaking"),
            AccumulationRule::Subtractive
        );
        assert_eq!(
            AccumulationRule::for_category("staking"),
            AccumulationRule::Additive
        );
        assert_eq!(
            AccumulationRule::for_category("pool2"),
            AccumulationRule::Additive
        );
    }

    #[test]
    fn test_fold_additive() {
        let toggles = ExtraTvlToggleSet::with_enabled(["staking"]);
        assert_eq!(toggles.fold_for("staking", true), Some(Fold::Add));
        assert_eq!(toggles.fold_for("Staking", false), Some(Fold::Add));
        assert_eq!(toggles.fold_for("pool2", true), None);
    }

    #[test]
    fn test_fold_subtractive() {
        let off = ExtraTvlToggleSet::new();
        assert_eq!(off.fold_for("doublecounted", true), Some(Fold::Subtract));
        assert_eq!(off.fold_for("doublecounted", false), None);

        let on = ExtraTvlToggleSet::with_enabled(["liquidstaking"]);
        assert_eq!(on.fold_for("liquidstaking", true), None);
        assert_eq!(on.fold_for("doublecounted", true), Some(Fold::Subtract));
    }

    #[test]
    fn test_parse_enabled_list() {
        let toggles = ExtraTvlToggleSet::parse_enabled_list(" staking, POOL2 ,,");
        assert!(toggles.is_enabled("staking"));
        assert!(toggles.is_enabled("pool2"));
        assert!(!toggles.is_enabled("borrowed"));
        assert_eq!(toggles.enabled_categories(), vec!["pool2", "staking"]);
    }
}
