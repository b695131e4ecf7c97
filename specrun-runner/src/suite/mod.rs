// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The suite hierarchy: specs, their examples, and the hooks shared between them.
//!
//! Specs and examples are declared up front and then handed to a
//! [`Runner`](crate::runner::Runner). While running, the engine records the state and exceptions
//! of each spec and example in place. All queries here scan the recorded state on every call, so
//! they are always consistent with the latest recorded outcomes.

mod entries;
mod example;
mod spec;

pub use entries::*;
pub use example::*;
pub use spec::*;

use crate::{
    outcome::ClassifiedException,
    runner::{RecordPolicy, RunStats},
};
use std::{
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

/// A cheaply cloneable view of the specs in a run, in declaration order.
///
/// Reporters may keep a clone from
/// [`Reporter::on_runner_start`](crate::reporter::Reporter::on_runner_start) to query live totals.
#[derive(Clone, Debug)]
pub struct Suite {
    specs: Rc<[Rc<Spec>]>,
}

impl Suite {
    pub(crate) fn new(specs: impl IntoIterator<Item = Spec>) -> Self {
        Self {
            specs: specs.into_iter().map(Rc::new).collect(),
        }
    }

    /// Returns the specs in declaration order.
    pub fn specs(&self) -> impl ExactSizeIterator<Item = &Spec> + '_ {
        self.specs.iter().map(|spec| &**spec)
    }

    /// Returns the number of specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if there are no specs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Returns the total number of examples across all specs.
    pub fn example_count(&self) -> usize {
        self.specs().map(|spec| spec.examples().len()).sum()
    }

    /// Returns the number of examples that recorded an assertion failure.
    pub fn total_failures(&self) -> usize {
        self.specs().map(Spec::total_failures).sum()
    }

    /// Returns the number of examples that recorded an error.
    pub fn total_errors(&self) -> usize {
        self.specs().map(Spec::total_errors).sum()
    }

    /// Returns true if any spec has an exception of its own or in one of its examples.
    pub fn has_exception(&self) -> bool {
        self.specs().any(Spec::has_exception)
    }

    /// Computes statistics for the latest recorded state.
    pub fn run_stats(&self) -> RunStats {
        let mut stats = RunStats {
            specs: self.len(),
            ..RunStats::default()
        };
        for spec in self.specs() {
            if spec.exception().is_some() {
                stats.spec_exceptions += 1;
            }
            for example in spec.examples() {
                stats.examples += 1;
                match example.state() {
                    RunState::Finished => {
                        stats.finished += 1;
                        match example.exception() {
                            None => stats.passed += 1,
                            Some(ex) if ex.is_failure() => stats.failed += 1,
                            Some(_) => stats.errored += 1,
                        }
                    }
                    RunState::NotRun | RunState::Running => stats.not_run += 1,
                }
            }
        }
        stats
    }

    pub(crate) fn shared_specs(&self) -> impl Iterator<Item = &Rc<Spec>> + '_ {
        self.specs.iter()
    }

    pub(crate) fn reset(&self) {
        for spec in self.specs() {
            spec.reset();
        }
    }
}

/// Whether a spec or example has run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RunState {
    /// Not started. Examples stay in this state if their spec's `before all` hook raised.
    #[default]
    NotRun,

    /// Started but not finished.
    Running,

    /// Finished, successfully or not.
    Finished,
}

/// The state recorded for a spec or an example while running.
#[derive(Debug, Default)]
pub(crate) struct Recorded {
    state: RunState,
    exceptions: Vec<ClassifiedException>,
    selected: Option<usize>,
}

impl Recorded {
    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    pub(crate) fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub(crate) fn finish(&mut self) {
        self.state = RunState::Finished;
    }

    pub(crate) fn record(&mut self, ex: ClassifiedException, policy: RecordPolicy) {
        self.exceptions.push(ex);
        let index = self.exceptions.len() - 1;
        match policy {
            RecordPolicy::Last => self.selected = Some(index),
            RecordPolicy::First => {
                self.selected.get_or_insert(index);
            }
        }
    }

    pub(crate) fn exception(&self) -> Option<&ClassifiedException> {
        self.selected.and_then(|index| self.exceptions.get(index))
    }

    pub(crate) fn exceptions(&self) -> &[ClassifiedException] {
        &self.exceptions
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Allocated from a process-wide counter, so ids increase in declaration order.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $name(u64);

        impl $name {
            fn next() -> Self {
                static NEXT: AtomicU64 = AtomicU64::new(1);
                Self(NEXT.fetch_add(1, Ordering::Relaxed))
            }

            /// Returns the numeric value of this id.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(SpecId, "Identifies a [`Spec`] to reporters.");
define_id!(ExampleId, "Identifies an [`Example`] to reporters.");
