//! Insertion-ordered rule accumulator.
//!
//! The registry is the only shared mutable state of a compilation pass: an
//! owned, explicitly passed map from canonical rule name to rule body.
//! Insertion order is semantically significant (it is the textual order of
//! rules in the final document), and the reservation sentinel is the sole
//! mechanism that lets cyclic record graphs terminate.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    /// Placeholder installed before recursing into a composite's fields.
    Reserved,
    Ready(String),
}

#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: IndexMap<String, Entry>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` is registered or reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Register `body` under `name`. The first registration wins; a second
    /// request for the same name leaves the existing entry untouched and
    /// returns false.
    pub fn register(&mut self, name: &str, body: String) -> bool {
        if self.rules.contains_key(name) {
            return false;
        }
        self.rules.insert(name.to_string(), Entry::Ready(body));
        true
    }

    /// Reserve `name` with a placeholder so recursive references resolve to
    /// it instead of re-entering the compilation.
    pub fn reserve(&mut self, name: &str) {
        self.rules
            .entry(name.to_string())
            .or_insert(Entry::Reserved);
    }

    /// Replace the reservation for `name` with its real body. The slot keeps
    /// its original insertion position.
    pub fn fulfill(&mut self, name: &str, body: String) {
        if let Some(slot) = self.rules.get_mut(name) {
            *slot = Entry::Ready(body);
        }
    }

    /// The registered body for `name`, if it has one (reservations don't).
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.rules.get(name) {
            Some(Entry::Ready(body)) => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Rule bodies in insertion order. Unfulfilled reservations are skipped;
    /// a successful compilation leaves none behind.
    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        self.rules.values().filter_map(|entry| match entry {
            Entry::Ready(body) => Some(body.as_str()),
            Entry::Reserved => None,
        })
    }

    /// Consume into the raw name → body mapping.
    pub fn into_rules(self) -> IndexMap<String, String> {
        self.rules
            .into_iter()
            .filter_map(|(name, entry)| match entry {
                Entry::Ready(body) => Some((name, body)),
                Entry::Reserved => None,
            })
            .collect()
    }
}
