//! Top-N ranking with a trailing "Others" bucket.

use crate::domain::{Decimal, NamedValue};

/// Label of the long-tail bucket.
pub const OTHERS_LABEL: &str = "Others";

/// Default number of entries kept ahead of the bucket.
pub const DEFAULT_KEEP_COUNT: usize = 10;

/// Top `keep_count` entries by TVL descending, then one `Others` entry holding
/// the sum of everything else.
///
/// `Others` is always present, with zero TVL when nothing remains. Equal TVLs
/// keep their input order.
pub fn summarize_top(entries: &[NamedValue], keep_count: usize) -> Vec<NamedValue> {
    let mut ranked: Vec<&NamedValue> = entries.iter().collect();
    ranked.sort_by(|a, b| b.tvl.cmp(&a.tvl));

    let split = keep_count.min(ranked.len());
    let others: Decimal = ranked[split..].iter().map(|e| e.tvl).sum();

    let mut out: Vec<NamedValue> = ranked[..split].iter().map(|e| (*e).clone()).collect();
    out.push(NamedValue::new(OTHERS_LABEL, others));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(values: &[(&str, i64)]) -> Vec<NamedValue> {
        values
            .iter()
            .map(|(n, v)| NamedValue::new(*n, Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn test_top_and_others() {
        let input = entries(&[("a", 1), ("b", 5), ("c", 3), ("d", 4)]);
        let out = summarize_top(&input, 2);
        let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "Others"]);
        assert_eq!(out[2].tvl, Decimal::from(4));
    }

    #[test]
    fn test_empty_remainder_still_emits_others() {
        let input = entries(&[("a", 1), ("b", 2)]);
        let out = summarize_top(&input, 10);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].name, OTHERS_LABEL);
        assert!(out[2].tvl.is_zero());

        let empty = summarize_top(&[], DEFAULT_KEEP_COUNT);
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_length_and_conservation() {
        let input: Vec<NamedValue> = (0..25)
            .map(|i| NamedValue::new(format!("chain{}", i), Decimal::from(i * 7 % 13)))
            .collect();
        for keep in [0usize, 1, 10, 25, 40] {
            let out = summarize_top(&input, keep);
            assert_eq!(out.len(), keep.min(input.len()) + 1);
            let in_sum: Decimal = input.iter().map(|e| e.tvl).sum();
            let out_sum: Decimal = out.iter().map(|e| e.tvl).sum();
            assert_eq!(in_sum, out_sum);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = entries(&[("x", 5), ("y", 5), ("z", 5)]);
        let out = summarize_top(&input, 2);
        assert_eq!(out[0].name, "x");
        assert_eq!(out[1].name, "y");
    }
}
