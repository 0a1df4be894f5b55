//! Ordered rule registry.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Entries are kept in insertion order and that order is the only
//! precedence mechanism: nothing is deduplicated or reordered. Registries
//! from several presets can be concatenated; the concatenation order becomes
//! part of the precedence contract.

use std::collections::HashMap;

use crate::rule::{RuleContext, RuleEntry};

/// An ordered collection of rule entries.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RuleEntry>,
    /// Static token → index of the first static entry with that token.
    static_index: HashMap<String, usize>,
    /// Indices of dynamic entries, ascending.
    dynamic: Vec<usize>,
}

/// A successful match: the winning entry's index and its declarations.
pub(crate) type Hit = (usize, crate::declarations::Declarations);

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries, preserving their order.
    pub fn register(&mut self, entries: impl IntoIterator<Item = RuleEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    /// Append a single entry.
    pub fn push(&mut self, entry: RuleEntry) {
        let index = self.entries.len();
        match entry.static_token() {
            Some(token) => {
                self.static_index.entry(token.to_string()).or_insert(index);
            }
            None => self.dynamic.push(index),
        }
        self.entries.push(entry);
    }

    /// Append every entry of `other` after the entries of `self`.
    pub fn extend(&mut self, other: &Registry) {
        self.register(other.entries.iter().cloned());
    }

    /// Concatenate registries in the given order.
    pub fn concat<'a>(registries: impl IntoIterator<Item = &'a Registry>) -> Self {
        let mut merged = Self::new();
        for registry in registries {
            merged.extend(registry);
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&RuleEntry> {
        self.entries.get(index)
    }

    /// Token or pattern of every entry, in precedence order.
    pub fn describe(&self) -> Vec<&str> {
        self.entries.iter().map(RuleEntry::describe).collect()
    }

    /// First entry (in order) that claims the token.
    ///
    /// Only dynamic entries ahead of the first static entry for this token
    /// need to be tried; the static entry wins if none of them does. This
    /// gives the same answer as trying every entry in order.
    pub(crate) fn first_match(&self, ctx: &RuleContext<'_>) -> Option<Hit> {
        let static_hit = self.static_index.get(ctx.token).copied();
        let limit = static_hit.unwrap_or(self.entries.len());

        let dynamic_hit = self
            .dynamic
            .iter()
            .take_while(|&&index| index < limit)
            .find_map(|&index| self.entries[index].apply(ctx).map(|d| (index, d)));

        dynamic_hit.or_else(|| {
            let index = static_hit?;
            self.entries[index].apply(ctx).map(|d| (index, d))
        })
    }

    /// Every entry that claims the token, in order.
    pub(crate) fn all_matches(&self, ctx: &RuleContext<'_>) -> Vec<Hit> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.apply(ctx).map(|d| (index, d)))
            .collect()
    }
}

impl FromIterator<RuleEntry> for Registry {
    fn from_iter<I: IntoIterator<Item = RuleEntry>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.register(iter);
        registry
    }
}
