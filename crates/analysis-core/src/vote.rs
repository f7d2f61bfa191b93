//! Majority voting over categorical labels.
//!
//! Ties are never collapsed here. Every label sharing the top count is
//! returned and rendering a tie is left to the caller (see [`join_labels`]).

use std::collections::HashMap;
use std::hash::Hash;

/// Return the labels that reach the highest occurrence count.
///
/// Labels are ordered by the moment their running count first reached the
/// current maximum. A label whose count strictly exceeds the maximum resets
/// the tied set; a label that equals it is appended once.
pub fn majority_labels<T, I>(labels: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut max_count = 0usize;
    let mut tied: Vec<T> = Vec::new();

    for label in labels {
        let count = counts.entry(label.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        if count > max_count {
            max_count = count;
            tied.clear();
            tied.push(label);
        } else if count == max_count && !tied.contains(&label) {
            tied.push(label);
        }
    }

    tied
}

/// Render a tied label set, e.g. `["positive", "neutral"]` -> `positive/neutral`
pub fn join_labels<T: std::fmt::Display>(labels: &[T], separator: &str) -> String {
    labels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
