// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::SpecHooks;
use crate::task::Task;
use indexmap::IndexMap;

/// What a named entry in a spec definition becomes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// `before all`: runs once before the first example.
    BeforeAll,

    /// `before` or `before each`: runs before every example.
    BeforeEach,

    /// `after` or `after each`: runs after every example.
    AfterEach,

    /// `after all`: runs once after the last example.
    AfterAll,

    /// Any other name.
    Example,
}

impl EntryKind {
    /// Classifies an entry by its name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "before all" => EntryKind::BeforeAll,
            "before" | "before each" => EntryKind::BeforeEach,
            "after" | "after each" => EntryKind::AfterEach,
            "after all" => EntryKind::AfterAll,
            _ => EntryKind::Example,
        }
    }
}

/// An ordered mapping from entry names to tasks, as produced by a declarative authoring layer.
///
/// Reserved names become hooks (see [`EntryKind`]) and every other entry becomes an example, in
/// insertion order. If several aliases of the same hook are present, the one inserted last wins.
#[derive(Clone, Debug, Default)]
pub struct SpecEntries {
    entries: IndexMap<String, Task>,
}

impl SpecEntries {
    /// Creates an empty set of entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the task previously stored under the same name.
    ///
    /// Replacing an entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, task: Task) -> Option<Task> {
        self.entries.insert(name.into(), task)
    }

    /// Returns the number of entries, hooks included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntryKind)> + '_ {
        self.entries
            .keys()
            .map(|name| (name.as_str(), EntryKind::from_name(name)))
    }

    pub(super) fn split(self) -> (SpecHooks, Vec<(String, Task)>) {
        let mut hooks = SpecHooks::default();
        let mut examples = Vec::new();
        for (name, task) in self.entries {
            match EntryKind::from_name(&name) {
                EntryKind::BeforeAll => hooks.before_all = task,
                EntryKind::BeforeEach => hooks.before_each = task,
                EntryKind::AfterEach => hooks.after_each = task,
                EntryKind::AfterAll => hooks.after_all = task,
                EntryKind::Example => examples.push((name, task)),
            }
        }
        (hooks, examples)
    }
}

impl<K: Into<String>> FromIterator<(K, Task)> for SpecEntries {
    fn from_iter<I: IntoIterator<Item = (K, Task)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, task)| (name.into(), task))
                .collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Task)> for SpecEntries {
    fn extend<I: IntoIterator<Item = (K, Task)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(name, task)| (name.into(), task)));
    }
}
