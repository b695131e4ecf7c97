// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observers notified at every lifecycle transition of a run.
//!
//! The engine calls a [`Reporter`] synchronously and never waits on it for its own progress. A
//! reporter that panics is logged and otherwise ignored.

mod log;

pub use log::*;

use crate::{
    runner::panic_hook::{self, CaptureMode},
    suite::{Example, Spec, Suite},
};
use std::{cell::RefCell, fmt, rc::Rc};
use tracing::warn;

/// Receives lifecycle events from a run.
///
/// Every method has an empty default implementation.
pub trait Reporter {
    /// Called once before anything runs.
    fn on_runner_start(&mut self, suite: &Suite) {
        let _ = suite;
    }

    /// Called once after every spec has completed.
    fn on_runner_end(&mut self, suite: &Suite) {
        let _ = suite;
    }

    /// Called before a spec's `before all` hook runs.
    fn on_spec_start(&mut self, spec: &Spec) {
        let _ = spec;
    }

    /// Called once a spec has completed, including when its `before all` hook raised.
    fn on_spec_end(&mut self, spec: &Spec) {
        let _ = spec;
    }

    /// Called before an example's `before` hook runs.
    fn on_example_start(&mut self, example: &Example) {
        let _ = example;
    }

    /// Called once an example has completed, including when its `before` hook raised.
    fn on_example_end(&mut self, example: &Example) {
        let _ = example;
    }
}

/// A reporter that ignores every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// A reporter shared between the steps of a run.
#[derive(Clone)]
pub(crate) struct SharedReporter {
    inner: Rc<RefCell<dyn Reporter>>,
}

impl SharedReporter {
    pub(crate) fn new(reporter: impl Reporter + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(reporter)),
        }
    }

    /// Delivers one event, catching any panic raised by the reporter.
    pub(crate) fn emit(&self, event: &'static str, f: impl FnOnce(&mut dyn Reporter)) {
        let Ok(mut reporter) = self.inner.try_borrow_mut() else {
            warn!(event, "reporter is already handling an event, skipping");
            return;
        };
        if let Err(caught) = panic_hook::catch(CaptureMode::Silent, || f(&mut *reporter)) {
            warn!(
                event,
                "reporter panicked: {}",
                panic_hook::payload_message(&*caught.payload)
            );
        }
    }
}

impl fmt::Debug for SharedReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedReporter").finish_non_exhaustive()
    }
}
