// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ExampleId, Recorded, RunState, SpecId};
use crate::{
    outcome::{ClassifiedException, Outcome},
    reporter::SharedReporter,
    runner::{CompositeExecutor, ContinuationPolicy, Executor, RecordPolicy},
    task::Task,
};
use std::{cell::RefCell, rc::Rc};

/// One test case: a body plus the `before` and `after` hooks inherited from its spec.
#[derive(Debug)]
pub struct Example {
    id: ExampleId,
    spec_id: SpecId,
    name: String,
    target: Task,
    before: Task,
    after: Task,
    recorded: RefCell<Recorded>,
}

impl Example {
    pub(super) fn new(
        spec_id: SpecId,
        name: String,
        target: Task,
        before: Task,
        after: Task,
    ) -> Self {
        Self {
            id: ExampleId::next(),
            spec_id,
            name,
            target,
            before,
            after,
            recorded: RefCell::default(),
        }
    }

    /// Returns the id of this example.
    pub fn id(&self) -> ExampleId {
        self.id
    }

    /// Returns the id of the spec this example belongs to.
    pub fn spec_id(&self) -> SpecId {
        self.spec_id
    }

    /// Returns the name of this example.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the body.
    pub fn target(&self) -> &Task {
        &self.target
    }

    /// Returns whether this example has run.
    pub fn state(&self) -> RunState {
        self.recorded.borrow().state()
    }

    /// Returns the outcome of this example, or `None` if it has not finished.
    pub fn outcome(&self) -> Option<Outcome> {
        let recorded = self.recorded.borrow();
        (recorded.state() == RunState::Finished).then(|| {
            recorded
                .exception()
                .map_or(Outcome::Success, ClassifiedException::to_outcome)
        })
    }

    /// Returns the recorded exception, chosen among [`exceptions`](Self::exceptions) by the run's
    /// [`RecordPolicy`].
    pub fn exception(&self) -> Option<ClassifiedException> {
        self.recorded.borrow().exception().cloned()
    }

    /// Returns every exception raised while running this example, in order.
    pub fn exceptions(&self) -> Vec<ClassifiedException> {
        self.recorded.borrow().exceptions().to_vec()
    }

    /// Returns true if the recorded exception is an assertion failure.
    pub fn is_failure(&self) -> bool {
        self.recorded
            .borrow()
            .exception()
            .is_some_and(ClassifiedException::is_failure)
    }

    /// Returns true if the recorded exception is an error.
    pub fn is_error(&self) -> bool {
        self.recorded
            .borrow()
            .exception()
            .is_some_and(ClassifiedException::is_error)
    }

    pub(super) fn reset(&self) {
        self.recorded.borrow_mut().reset();
    }

    /// Assembles the chain for this example:
    ///
    /// ```text
    /// abort [ start, before, continue [ target, after, end ] ]
    /// ```
    pub(super) fn executor(
        self: &Rc<Self>,
        reporter: &SharedReporter,
        policy: RecordPolicy,
    ) -> CompositeExecutor {
        let mut setup = CompositeExecutor::new(ContinuationPolicy::AbortOnException);
        setup.add_function(Task::new({
            let example = Rc::clone(self);
            let reporter = reporter.clone();
            move |_| {
                example.recorded.borrow_mut().start();
                reporter.emit("example start", |r| r.on_example_start(&example));
                Ok(())
            }
        }));
        setup.add_executor(Executor::new(self.before.clone()).on_exception({
            let example = Rc::clone(self);
            let reporter = reporter.clone();
            move |ex| {
                example.record(ex, policy);
                example.finish(&reporter);
            }
        }));

        let mut body = CompositeExecutor::new(ContinuationPolicy::ContinueOnException);
        body.add_executor(Executor::new(self.target.clone()).on_exception({
            let example = Rc::clone(self);
            move |ex| example.record(ex, policy)
        }));
        body.add_executor(Executor::new(self.after.clone()).on_exception({
            let example = Rc::clone(self);
            move |ex| example.record(ex, policy)
        }));
        body.add_function(Task::new({
            let example = Rc::clone(self);
            let reporter = reporter.clone();
            move |_| {
                example.finish(&reporter);
                Ok(())
            }
        }));

        setup.add_executor(body);
        setup
    }

    fn record(&self, ex: &ClassifiedException, policy: RecordPolicy) {
        self.recorded.borrow_mut().record(ex.clone(), policy);
    }

    fn finish(&self, reporter: &SharedReporter) {
        self.recorded.borrow_mut().finish();
        reporter.emit("example end", |r| r.on_example_end(self));
    }
}
