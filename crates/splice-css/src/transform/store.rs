//! Selector-to-declarations mapping harvested from rule bodies.

use std::collections::BTreeMap;

use serde::Serialize;

/// An append-only mapping from selector key to the raw declarations found
/// in that selector's rule bodies.
///
/// Appending under an existing key concatenates; nothing is ever overwritten.
/// Keys iterate in sorted order, so dumps are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleStore {
    rules: BTreeMap<String, Vec<String>>,
}

impl RuleStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Append `declarations` under `key`.
    ///
    /// The key is created even when `declarations` is empty, so an empty rule
    /// body still counts as a known selector.
    pub fn append<I>(&mut self, key: impl Into<String>, declarations: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.rules.entry(key.into()).or_default().extend(declarations);
    }

    /// The declarations recorded for `key`, in the order they were appended.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.rules.get(key).map(Vec::as_slice)
    }

    /// Returns true if `key` has been recorded.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Number of distinct selector keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no selector has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over `(key, declarations)` pairs, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules
            .iter()
            .map(|(key, declarations)| (key.as_str(), declarations.as_slice()))
    }

    /// Append every entry of `other` into this store.
    pub fn merge(&mut self, other: Self) {
        for (key, declarations) in other.rules {
            self.append(key, declarations);
        }
    }
}
