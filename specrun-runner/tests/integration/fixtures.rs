// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use specrun_runner::{
    reporter::Reporter,
    suite::{Example, Spec, Suite},
    task::Task,
};
use std::{cell::RefCell, rc::Rc};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Event {
    RunnerStart,
    RunnerEnd,
    SpecStart(String),
    SpecEnd(String),
    ExampleStart(String),
    ExampleEnd(String),
}

/// Records every lifecycle event. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Rc<RefCell<Vec<Event>>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| pred(event)).count()
    }
}

impl Reporter for RecordingReporter {
    fn on_runner_start(&mut self, _suite: &Suite) {
        self.events.borrow_mut().push(Event::RunnerStart);
    }

    fn on_runner_end(&mut self, _suite: &Suite) {
        self.events.borrow_mut().push(Event::RunnerEnd);
    }

    fn on_spec_start(&mut self, spec: &Spec) {
        self.events
            .borrow_mut()
            .push(Event::SpecStart(spec.context().to_owned()));
    }

    fn on_spec_end(&mut self, spec: &Spec) {
        self.events
            .borrow_mut()
            .push(Event::SpecEnd(spec.context().to_owned()));
    }

    fn on_example_start(&mut self, example: &Example) {
        self.events
            .borrow_mut()
            .push(Event::ExampleStart(example.name().to_owned()));
    }

    fn on_example_end(&mut self, example: &Example) {
        self.events
            .borrow_mut()
            .push(Event::ExampleEnd(example.name().to_owned()));
    }
}

/// A shared log of which tasks ran, in order.
#[derive(Clone, Debug, Default)]
pub(crate) struct TaskLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl TaskLog {
    /// A task that appends `name` to the log and returns normally.
    pub(crate) fn task(&self, name: &str) -> Task {
        let entries = self.entries.clone();
        let name = name.to_owned();
        Task::new(move |_| {
            entries.borrow_mut().push(name.clone());
            Ok(())
        })
    }

    /// A task that appends `name` to the log and then returns an error.
    pub(crate) fn failing_task(&self, name: &str) -> Task {
        let entries = self.entries.clone();
        let name = name.to_owned();
        Task::new(move |_| {
            entries.borrow_mut().push(name.clone());
            Err(format!("{name} failed").into())
        })
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.entries.borrow().iter().filter(|entry| *entry == name).count()
    }
}
