//! Deterministic grouping helpers shared by the pipeline stages.
//!
//! Every per-group computation runs on rows sorted by `(group key, timestamp,
//! report position)`. The helpers here keep that ordering explicit and turn
//! the per-group scans (running counts, lags, run detection) into pure
//! functions over aligned slices.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use tracing::debug;

/// Stable-sort `rows` by `key` unless they already are.
///
/// `key` should end with the report position so ties never depend on the
/// incoming order.
pub fn ensure_sorted_by<T, K, F>(rows: &mut [T], stage: &str, key: F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    if rows.is_sorted_by_key(&key) {
        return;
    }
    debug!("[golden_source:{stage}] rows not in group order; re-sorting");
    rows.sort_by_key(key);
}

/// Contiguous index ranges of rows sharing the same group key.
///
/// Rows must already be sorted so that each group is contiguous.
pub fn group_ranges<T, K, F>(rows: &[T], key: F) -> Vec<Range<usize>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut ranges = Vec::new();
    let mut start = 0usize;
    for idx in 1..=rows.len() {
        if idx == rows.len() || key(&rows[idx]) != key(&rows[start]) {
            if start < idx {
                ranges.push(start..idx);
            }
            start = idx;
        }
    }
    ranges
}

/// Running count of `true` values, current position included.
pub fn cumulative_count<I>(flags: I) -> Vec<u32>
where
    I: IntoIterator<Item = bool>,
{
    let mut running = 0u32;
    flags
        .into_iter()
        .map(|flag| {
            if flag {
                running += 1;
            }
            running
        })
        .collect()
}

/// Shift `values` down by one position, filling the first slot with `fill`.
pub fn lagged<T: Clone>(values: &[T], fill: T) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(fill);
    out.extend_from_slice(&values[..values.len() - 1]);
    out
}

/// Marks the last position of every maximal run of equal labels.
///
/// `["a", "a", "b", "a"]` keeps positions 1, 2 and 3.
pub fn run_last_mask<K: PartialEq>(labels: &[K]) -> Vec<bool> {
    labels
        .iter()
        .enumerate()
        .map(|(idx, label)| labels.get(idx + 1) != Some(label))
        .collect()
}

/// Marks every position whose value occurs more than once.
pub fn duplicated_mask<K: Eq + Hash>(values: &[K]) -> Vec<bool> {
    let mut counts: HashMap<&K, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    values
        .iter()
        .map(|value| counts.get(value).copied().unwrap_or_default() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ranges_split_contiguous_keys() {
        let rows = ["a", "a", "b", "c", "c", "c"];
        assert_eq!(group_ranges(&rows, |row| *row), vec![0..2, 2..3, 3..6]);
        let empty: [&str; 0] = [];
        assert!(group_ranges(&empty, |row| *row).is_empty());
    }

    #[test]
    fn ensure_sorted_by_is_stable_for_ties() {
        let mut rows = vec![("b", 0), ("a", 2), ("a", 1), ("b", 1)];
        ensure_sorted_by(&mut rows, "test", |row| row.0);
        assert_eq!(rows, vec![("a", 2), ("a", 1), ("b", 0), ("b", 1)]);
    }

    #[test]
    fn cumulative_count_includes_current_row() {
        assert_eq!(
            cumulative_count([true, false, true, true]),
            vec![1, 1, 2, 3]
        );
    }

    #[test]
    fn lagged_fills_first_slot() {
        assert_eq!(lagged(&[1, 2, 3], 0), vec![0, 1, 2]);
        assert!(lagged::<u32>(&[], 0).is_empty());
    }

    #[test]
    fn run_last_mask_keeps_run_tails() {
        assert_eq!(
            run_last_mask(&["a", "a", "b", "a"]),
            vec![false, true, true, true]
        );
        assert_eq!(run_last_mask(&["x"]), vec![true]);
    }

    #[test]
    fn duplicated_mask_flags_every_copy() {
        assert_eq!(
            duplicated_mask(&[1, 2, 1, 3]),
            vec![true, false, true, false]
        );
    }
}
