// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Reporter;
use crate::{
    outcome::Outcome,
    suite::{Example, Spec, Suite},
};
use tracing::{debug, info, warn};

/// A reporter that forwards lifecycle events to [`tracing`].
///
/// Example and spec ends are logged at `info` level, starts at `debug` level. Running totals are
/// re-read from the suite at every example end.
#[derive(Debug, Default)]
pub struct LogReporter {
    suite: Option<Suite>,
}

impl LogReporter {
    /// Creates a new log reporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for LogReporter {
    fn on_runner_start(&mut self, suite: &Suite) {
        info!(
            specs = suite.len(),
            examples = suite.example_count(),
            "starting {} examples across {} specs",
            suite.example_count(),
            suite.len(),
        );
        self.suite = Some(suite.clone());
    }

    fn on_runner_end(&mut self, suite: &Suite) {
        let stats = suite.run_stats();
        if stats.is_success() {
            info!("{stats}");
        } else {
            warn!("{stats}");
        }
    }

    fn on_spec_start(&mut self, spec: &Spec) {
        debug!(spec_id = %spec.id(), "spec started: {}", spec.context());
    }

    fn on_spec_end(&mut self, spec: &Spec) {
        match spec.exception() {
            Some(ex) => warn!(spec_id = %spec.id(), "{}: {ex}", spec.context()),
            None => info!(
                spec_id = %spec.id(),
                failures = spec.total_failures(),
                errors = spec.total_errors(),
                "spec finished: {}",
                spec.context()
            ),
        }
    }

    fn on_example_start(&mut self, example: &Example) {
        debug!(example_id = %example.id(), "example started: {}", example.name());
    }

    fn on_example_end(&mut self, example: &Example) {
        let (failures, errors) = self
            .suite
            .as_ref()
            .map_or((0, 0), |suite| (suite.total_failures(), suite.total_errors()));
        match example.outcome() {
            Some(outcome @ Outcome::Success) => {
                info!(failures, errors, "{outcome:>5} {}", example.name())
            }
            Some(outcome) => {
                let location = outcome
                    .location()
                    .map(|location| format!(" (at {location})"))
                    .unwrap_or_default();
                info!(
                    failures,
                    errors,
                    "{outcome:>5} {}: {}{location}",
                    example.name(),
                    outcome.message().unwrap_or_default(),
                )
            }
            None => debug!("example ended without finishing: {}", example.name()),
        }
    }
}
