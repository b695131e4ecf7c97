// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Example, Recorded, RunState, SpecEntries, SpecId};
use crate::{
    outcome::ClassifiedException,
    reporter::SharedReporter,
    runner::{CompositeExecutor, ContinuationPolicy, Executor, RecordPolicy},
    task::Task,
};
use std::{cell::RefCell, rc::Rc};

/// The four hooks of a spec. Hooks that are not declared are no-ops.
#[derive(Clone, Debug, Default)]
pub struct SpecHooks {
    /// Runs once before the first example. If it raises, no example runs.
    pub before_all: Task,

    /// Runs before every example. If it raises, that example's body and `after` hook are skipped.
    pub before_each: Task,

    /// Runs after every example, even if the body raised.
    pub after_each: Task,

    /// Runs once after the last example, even if examples raised.
    pub after_all: Task,
}

/// A named group of examples sharing setup and teardown hooks.
#[derive(Debug)]
pub struct Spec {
    id: SpecId,
    context: String,
    examples: Vec<Rc<Example>>,
    hooks: SpecHooks,
    recorded: RefCell<Recorded>,
}

impl Spec {
    /// Creates a spec from a suite definition mapping.
    pub fn new(context: impl Into<String>, entries: SpecEntries) -> Self {
        let (hooks, examples) = entries.split();
        Self::from_parts(context.into(), hooks, examples)
    }

    /// Returns a builder for a spec with the given context label.
    pub fn builder(context: impl Into<String>) -> SpecBuilder {
        SpecBuilder {
            context: context.into(),
            hooks: SpecHooks::default(),
            examples: Vec::new(),
        }
    }

    fn from_parts(context: String, hooks: SpecHooks, examples: Vec<(String, Task)>) -> Self {
        let id = SpecId::next();
        let examples = examples
            .into_iter()
            .map(|(name, target)| {
                Rc::new(Example::new(
                    id,
                    name,
                    target,
                    hooks.before_each.clone(),
                    hooks.after_each.clone(),
                ))
            })
            .collect();
        Self {
            id,
            context,
            examples,
            hooks,
            recorded: RefCell::default(),
        }
    }

    /// Returns the id of this spec.
    pub fn id(&self) -> SpecId {
        self.id
    }

    /// Returns the context label.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the examples in declaration order.
    pub fn examples(&self) -> impl ExactSizeIterator<Item = &Example> + '_ {
        self.examples.iter().map(|example| &**example)
    }

    /// Returns the hooks of this spec.
    pub fn hooks(&self) -> &SpecHooks {
        &self.hooks
    }

    /// Returns whether this spec has run.
    pub fn state(&self) -> RunState {
        self.recorded.borrow().state()
    }

    /// Returns the exception recorded for this spec's own `before all` or `after all` hook.
    pub fn exception(&self) -> Option<ClassifiedException> {
        self.recorded.borrow().exception().cloned()
    }

    /// Returns every exception raised by this spec's own hooks, in order.
    pub fn exceptions(&self) -> Vec<ClassifiedException> {
        self.recorded.borrow().exceptions().to_vec()
    }

    /// Returns the number of examples that recorded an assertion failure.
    pub fn total_failures(&self) -> usize {
        self.examples().filter(|example| example.is_failure()).count()
    }

    /// Returns the number of examples that recorded an error.
    pub fn total_errors(&self) -> usize {
        self.examples().filter(|example| example.is_error()).count()
    }

    /// Returns true if any example raised, or this spec's own hooks did.
    ///
    /// Unlike [`total_failures`](Self::total_failures) and [`total_errors`](Self::total_errors),
    /// which count examples only, this includes a `before all` or `after all` exception.
    pub fn has_exception(&self) -> bool {
        self.total_failures() > 0 || self.total_errors() > 0 || self.exception().is_some()
    }

    pub(crate) fn reset(&self) {
        self.recorded.borrow_mut().reset();
        for example in self.examples() {
            example.reset();
        }
    }

    /// Assembles the chain for this spec:
    ///
    /// ```text
    /// abort [ start, before all, continue [ example..., after all, end ] ]
    /// ```
    ///
    /// If `before all` raises, the rest is skipped and its exception callback ends the spec.
    pub(crate) fn executor(
        self: &Rc<Self>,
        reporter: &SharedReporter,
        policy: RecordPolicy,
    ) -> CompositeExecutor {
        let mut setup = CompositeExecutor::new(ContinuationPolicy::AbortOnException);
        setup.add_function(self.start_task(reporter));
        setup.add_executor(
            Executor::new(self.hooks.before_all.clone()).on_exception({
                let spec = Rc::clone(self);
                let reporter = reporter.clone();
                move |ex| {
                    spec.recorded.borrow_mut().record(ex.clone(), policy);
                    spec.finish(&reporter);
                }
            }),
        );

        let mut body = CompositeExecutor::new(ContinuationPolicy::ContinueOnException);
        for example in &self.examples {
            body.add_executor(example.executor(reporter, policy));
        }
        body.add_executor(
            Executor::new(self.hooks.after_all.clone()).on_exception({
                let spec = Rc::clone(self);
                move |ex| spec.recorded.borrow_mut().record(ex.clone(), policy)
            }),
        );
        body.add_function(Task::new({
            let spec = Rc::clone(self);
            let reporter = reporter.clone();
            move |_| {
                spec.finish(&reporter);
                Ok(())
            }
        }));

        setup.add_executor(body);
        setup
    }

    fn start_task(self: &Rc<Self>, reporter: &SharedReporter) -> Task {
        let spec = Rc::clone(self);
        let reporter = reporter.clone();
        Task::new(move |_| {
            spec.recorded.borrow_mut().start();
            reporter.emit("spec start", |r| r.on_spec_start(&spec));
            Ok(())
        })
    }

    fn finish(&self, reporter: &SharedReporter) {
        self.recorded.borrow_mut().finish();
        reporter.emit("spec end", |r| r.on_spec_end(self));
    }
}

/// Builds a [`Spec`] hook by hook and example by example.
#[derive(Debug)]
#[must_use]
pub struct SpecBuilder {
    context: String,
    hooks: SpecHooks,
    examples: Vec<(String, Task)>,
}

impl SpecBuilder {
    /// Sets the `before all` hook.
    pub fn before_all(mut self, task: Task) -> Self {
        self.hooks.before_all = task;
        self
    }

    /// Sets the `before each` hook.
    pub fn before_each(mut self, task: Task) -> Self {
        self.hooks.before_each = task;
        self
    }

    /// Sets the `after each` hook.
    pub fn after_each(mut self, task: Task) -> Self {
        self.hooks.after_each = task;
        self
    }

    /// Sets the `after all` hook.
    pub fn after_all(mut self, task: Task) -> Self {
        self.hooks.after_all = task;
        self
    }

    /// Appends an example.
    pub fn example(mut self, name: impl Into<String>, target: Task) -> Self {
        self.examples.push((name.into(), target));
        self
    }

    /// Builds the spec.
    pub fn build(self) -> Spec {
        Spec::from_parts(self.context, self.hooks, self.examples)
    }
}
