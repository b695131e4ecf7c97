// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Units of work supplied by suite authors.

use crate::assertion::AssertionFailure;
use debug_ignore::DebugIgnore;
use std::{error::Error, rc::Rc};

/// The result returned by a task body.
///
/// Returning `Err` is classified as an [`Error`](crate::outcome::ExceptionKind::Error). Assertion
/// failures are raised by panicking through the helpers in [`assertion`](crate::assertion).
pub type TaskResult = Result<(), Box<dyn Error>>;

type TaskFn = dyn Fn(&mut TaskContext) -> TaskResult;

/// Whether a task may be executed a second time after an assertion failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReplaySafety {
    /// Re-running the task up to its failing assertion is harmless.
    Idempotent,

    /// The task must run at most once per scheduling.
    RunOnce,
}

/// A zero-argument unit of work that either returns normally or raises.
///
/// Tasks are cheap to clone: `before each` and `after each` hooks are shared by every example in a
/// spec.
///
/// # Replay contract
///
/// With [`RecoverByReplay`](crate::runner::LocationStrategy::RecoverByReplay), a task that fails
/// an assertion is executed a second time to recover the assertion's source location. Only tasks
/// constructed with [`Task::idempotent`] are replayed; the constructor is the author's promise
/// that executing the task again, up to and including the failing assertion, has no observable
/// side effects. Tasks built with [`Task::new`] are never re-executed and report failures without
/// a location under that strategy.
#[derive(Clone, Debug)]
pub struct Task {
    body: DebugIgnore<Rc<TaskFn>>,
    replay: ReplaySafety,
}

impl Task {
    /// Creates a task that is never re-executed.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut TaskContext) -> TaskResult + 'static,
    {
        Self {
            body: DebugIgnore(Rc::new(body)),
            replay: ReplaySafety::RunOnce,
        }
    }

    /// Creates a task that may be replayed to recover assertion locations.
    pub fn idempotent<F>(body: F) -> Self
    where
        F: Fn(&mut TaskContext) -> TaskResult + 'static,
    {
        Self {
            body: DebugIgnore(Rc::new(body)),
            replay: ReplaySafety::Idempotent,
        }
    }

    /// A task that does nothing. Used for hooks that weren't declared.
    pub fn noop() -> Self {
        Self::idempotent(|_| Ok(()))
    }

    /// Returns the replay safety declared at construction.
    pub fn replay_safety(&self) -> ReplaySafety {
        self.replay
    }

    /// Returns true if this task may be replayed.
    pub fn is_replay_safe(&self) -> bool {
        self.replay == ReplaySafety::Idempotent
    }

    pub(crate) fn call(&self, cx: &mut TaskContext) -> TaskResult {
        (self.body)(cx)
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::noop()
    }
}

/// State visible to a running task and to the assertion helpers it calls.
///
/// This carries the two flags used by the two-pass recovery protocol. The engine resets both at the
/// start of every fresh execution, so a flag set by one task is never observed by the next.
#[derive(Debug, Default)]
pub struct TaskContext {
    pending_failure: Option<AssertionFailure>,
    second_pass: bool,
}

impl TaskContext {
    /// Returns true while the engine is replaying a task to recover an assertion location.
    ///
    /// Assertion helpers must raise at the same call site without re-evaluating their explanation
    /// when this is true.
    pub fn is_second_pass(&self) -> bool {
        self.second_pass
    }

    /// Returns the assertion failure flagged during this execution, if any.
    pub fn pending_failure(&self) -> Option<&AssertionFailure> {
        self.pending_failure.as_ref()
    }

    /// Flags an assertion failure. Matchers call this immediately before raising.
    pub fn flag_failure(&mut self, failure: AssertionFailure) {
        self.pending_failure = Some(failure);
    }

    pub(crate) fn begin_second_pass(&mut self) {
        self.second_pass = true;
    }

    /// Clears both flags, returning the pending failure.
    pub(crate) fn clear(&mut self) -> Option<AssertionFailure> {
        self.second_pass = false;
        self.pending_failure.take()
    }
}
