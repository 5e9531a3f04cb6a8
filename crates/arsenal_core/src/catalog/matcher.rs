//! Resolution of detected names against the known catalog.
//!
//! Detectors (screen readers, hand-typed lists) produce names with free
//! casing and spaces where the catalog uses underscores. The matcher maps
//! such input back to canonical catalog names before bulk import.

use super::non_blank_lines;
use std::collections::{BTreeSet, HashMap};

/// Canonical lookup form: trimmed, whitespace runs as `_`, lowercase.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Result of resolving a batch of detected names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    /// Canonical catalog names that matched at least one input line.
    pub matched: BTreeSet<String>,
    /// Non-empty input lines with no catalog counterpart, trimmed.
    pub unmatched: Vec<String>,
}

/// Case-insensitive, underscore-normalized index of catalog names.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    by_normalized: HashMap<String, String>,
}

impl NameMatcher {
    /// Builds the index. When two catalog names normalize to the same key,
    /// the lexicographically first one wins so the result is deterministic.
    pub fn new<I, S>(known_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut by_normalized: HashMap<String, String> = HashMap::new();
        for name in known_names {
            let name = name.into();
            let key = normalize_name(&name);
            if key.is_empty() {
                continue;
            }
            match by_normalized.get(&key) {
                Some(existing) if existing <= &name => {}
                _ => {
                    by_normalized.insert(key, name);
                }
            }
        }
        Self { by_normalized }
    }

    pub fn len(&self) -> usize {
        self.by_normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_normalized.is_empty()
    }

    /// Returns the canonical catalog name for `raw`, if any.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        self.by_normalized
            .get(&normalize_name(raw))
            .map(String::as_str)
    }

    /// Resolves every non-blank line of `text`.
    pub fn resolve_text(&self, text: &str) -> MatchReport {
        let mut report = MatchReport::default();
        for line in non_blank_lines(text) {
            match self.resolve(line) {
                Some(name) => {
                    report.matched.insert(name.to_string());
                }
                None => report.unmatched.push(line.to_string()),
            }
        }
        report
    }
}
