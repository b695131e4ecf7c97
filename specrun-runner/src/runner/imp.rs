// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CompositeExecutor, ContinuationPolicy, ExecutionContext, RunOptions};
use crate::{
    errors::RunError,
    reporter::{Reporter, SharedReporter},
    suite::{Spec, Suite},
};
use std::fmt;
use tracing::debug;

/// Runs a suite of specs in declaration order, reporting every lifecycle transition.
///
/// Specs are chained so that one spec's failing `before all` hook never prevents the remaining
/// specs from running.
#[derive(Debug)]
pub struct Runner {
    suite: Suite,
    reporter: SharedReporter,
    options: RunOptions,
}

impl Runner {
    /// Creates a new runner with default [`RunOptions`].
    pub fn new(specs: impl IntoIterator<Item = Spec>, reporter: impl Reporter + 'static) -> Self {
        Self {
            suite: Suite::new(specs),
            reporter: SharedReporter::new(reporter),
            options: RunOptions::default(),
        }
    }

    /// Sets the options for subsequent runs.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options for this runner.
    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Returns the suite being run.
    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    /// Returns the specs in declaration order.
    pub fn specs(&self) -> impl ExactSizeIterator<Item = &Spec> + '_ {
        self.suite.specs()
    }

    /// Returns the number of examples that recorded an assertion failure, across all specs.
    pub fn total_failures(&self) -> usize {
        self.suite.total_failures()
    }

    /// Returns the number of examples that recorded an error, across all specs.
    pub fn total_errors(&self) -> usize {
        self.suite.total_errors()
    }

    /// Returns true if any example raised, or any spec's own `before all` or `after all` hook did.
    ///
    /// Hook exceptions are not counted by [`total_failures`](Self::total_failures) or
    /// [`total_errors`](Self::total_errors).
    pub fn has_exception(&self) -> bool {
        self.suite.has_exception()
    }

    /// Runs every spec to completion.
    ///
    /// Recorded state from a previous run is cleared first. Must be awaited on a runtime whose
    /// current thread may drive a [`LocalSet`](tokio::task::LocalSet), such as a current-thread
    /// runtime.
    pub async fn run(&self) -> Result<RunStats, RunError> {
        self.suite.reset();
        let cx = ExecutionContext::new(self.options);
        debug!(
            specs = self.suite.len(),
            examples = self.suite.example_count(),
            location_strategy = %self.options.location_strategy,
            record_policy = %self.options.record_policy,
            "starting run"
        );

        self.reporter
            .emit("runner start", |r| r.on_runner_start(&self.suite));

        let mut root = CompositeExecutor::new(ContinuationPolicy::ContinueOnException).on_success({
            let suite = self.suite.clone();
            let reporter = self.reporter.clone();
            move || reporter.emit("runner end", |r| r.on_runner_end(&suite))
        });
        for spec in self.suite.shared_specs() {
            root.add_executor(spec.executor(&self.reporter, self.options.record_policy));
        }

        if let Err(ex) = cx.drive(root).await? {
            debug!("run completed with an escalated exception: {ex}");
        }

        let stats = self.suite.run_stats();
        debug!(%stats, "run finished");
        Ok(stats)
    }

    /// Runs every spec to completion on a new current-thread runtime.
    pub fn run_blocking(&self) -> Result<RunStats, RunError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(RunError::Runtime)?;
        runtime.block_on(self.run())
    }
}

/// Statistics for a completed run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of specs.
    pub specs: usize,

    /// The total number of examples.
    pub examples: usize,

    /// The number of examples that ran to completion.
    pub finished: usize,

    /// The number of examples that passed.
    pub passed: usize,

    /// The number of examples that recorded an assertion failure.
    pub failed: usize,

    /// The number of examples that recorded an error.
    pub errored: usize,

    /// The number of examples that never ran, because a `before all` hook raised.
    pub not_run: usize,

    /// The number of specs whose own `before all` or `after all` hook raised.
    pub spec_exceptions: usize,
}

impl RunStats {
    /// Returns true if this run is considered a success.
    ///
    /// A run is marked as failed if any of the following are true:
    /// * any examples did not run
    /// * any examples failed or errored
    /// * any `before all` or `after all` hook raised
    pub fn is_success(&self) -> bool {
        if self.not_run > 0 {
            return false;
        }
        if self.failed > 0 || self.errored > 0 || self.spec_exceptions > 0 {
            return false;
        }
        true
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} examples run: {} passed, {} failed, {} errored, {} not run",
            self.finished, self.passed, self.failed, self.errored, self.not_run
        )
    }
}
