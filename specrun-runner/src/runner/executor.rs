// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ExecutionContext, classify::Attempt};
use crate::{outcome::ClassifiedException, task::Task};
use debug_ignore::DebugIgnore;
use tracing::trace;

/// The aggregate result of an [`ExecutionUnit`].
pub type UnitResult = Result<(), ClassifiedException>;

/// Continuation invoked exactly once when an [`ExecutionUnit`] completes.
pub type Completion = Box<dyn FnOnce(UnitResult)>;

pub(super) type SuccessCallback = DebugIgnore<Box<dyn FnOnce()>>;
pub(super) type ExceptionCallback = DebugIgnore<Box<dyn FnOnce(&ClassifiedException)>>;

/// Something that can be run as one step of a [`CompositeExecutor`](super::CompositeExecutor).
///
/// Implementations must call `done` exactly once, and must not call it before their own callbacks
/// have returned.
pub trait ExecutionUnit {
    /// Starts running this unit.
    fn start(self: Box<Self>, cx: ExecutionContext, done: Completion);
}

/// Runs one [`Task`] at the next scheduling boundary and classifies its outcome.
///
/// Exactly one of the success and exception callbacks fires per run.
#[derive(Debug)]
pub struct Executor {
    task: Task,
    on_success: Option<SuccessCallback>,
    on_exception: Option<ExceptionCallback>,
}

impl Executor {
    /// Creates a new executor for `task`, with no callbacks.
    pub fn new(task: Task) -> Self {
        Self {
            task,
            on_success: None,
            on_exception: None,
        }
    }

    /// Sets the callback invoked when the task returns normally.
    pub fn on_success(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_success = Some(DebugIgnore(Box::new(f)));
        self
    }

    /// Sets the callback invoked with the classified exception when the task raises.
    pub fn on_exception(mut self, f: impl FnOnce(&ClassifiedException) + 'static) -> Self {
        self.on_exception = Some(DebugIgnore(Box::new(f)));
        self
    }

    /// Returns the task this executor runs.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Schedules the task. It does not run inline with the caller.
    ///
    /// Must be called from within a tokio [`LocalSet`](tokio::task::LocalSet), for example one
    /// set up by [`ExecutionContext::drive`].
    pub fn run(self, cx: &ExecutionContext) {
        Box::new(self).start(cx.clone(), Box::new(|_| {}));
    }

    fn schedule(self: Box<Self>, cx: ExecutionContext, done: Completion) {
        tokio::task::spawn_local(async move { self.execute(cx, done) });
    }

    fn execute(self: Box<Self>, cx: ExecutionContext, done: Completion) {
        trace!(replay_safety = ?self.task.replay_safety(), "running task");
        match cx.attempt(&self.task) {
            Attempt::Replay => self.schedule(cx, done),
            Attempt::Finished(result) => {
                let Executor {
                    on_success,
                    on_exception,
                    ..
                } = *self;
                match &result {
                    Ok(()) => {
                        if let Some(DebugIgnore(f)) = on_success {
                            f();
                        }
                    }
                    Err(ex) => {
                        if let Some(DebugIgnore(f)) = on_exception {
                            f(ex);
                        }
                    }
                }
                done(result);
            }
        }
    }
}

impl ExecutionUnit for Executor {
    fn start(self: Box<Self>, cx: ExecutionContext, done: Completion) {
        self.schedule(cx, done);
    }
}
