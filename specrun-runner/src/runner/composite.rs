// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    Completion, ExecutionContext, ExecutionUnit, Executor, UnitResult,
    executor::{ExceptionCallback, SuccessCallback},
};
use crate::{outcome::ClassifiedException, task::Task};
use debug_ignore::DebugIgnore;
use std::{fmt, vec};
use tracing::debug;

/// What a [`CompositeExecutor`] does when one of its steps raises.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContinuationPolicy {
    /// Skip the remaining steps and report the exception to the owner.
    #[default]
    AbortOnException,

    /// Keep running the remaining steps. The owner always sees the chain complete successfully.
    ContinueOnException,
}

impl ContinuationPolicy {
    /// Returns the policy for a `continue_on_exception` flag.
    pub fn from_continue_on_exception(continue_on_exception: bool) -> Self {
        if continue_on_exception {
            Self::ContinueOnException
        } else {
            Self::AbortOnException
        }
    }

    /// Returns true if later steps run after an exception.
    pub fn continues_on_exception(self) -> bool {
        self == Self::ContinueOnException
    }
}

/// An ordered chain of execution units, run strictly one after another.
///
/// Step *N + 1* is started only after step *N* and all of its callbacks have completed.
pub struct CompositeExecutor {
    queue: Vec<Box<dyn ExecutionUnit>>,
    policy: ContinuationPolicy,
    on_success: Option<SuccessCallback>,
    on_exception: Option<ExceptionCallback>,
}

impl CompositeExecutor {
    /// Creates an empty chain with the given policy.
    pub fn new(policy: ContinuationPolicy) -> Self {
        Self {
            queue: Vec::new(),
            policy,
            on_success: None,
            on_exception: None,
        }
    }

    /// Sets the callback invoked once the whole chain completes.
    pub fn on_success(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_success = Some(DebugIgnore(Box::new(f)));
        self
    }

    /// Sets the callback invoked when the chain aborts. Never fires under
    /// [`ContinuationPolicy::ContinueOnException`].
    pub fn on_exception(mut self, f: impl FnOnce(&ClassifiedException) + 'static) -> Self {
        self.on_exception = Some(DebugIgnore(Box::new(f)));
        self
    }

    /// Returns the continuation policy.
    pub fn policy(&self) -> ContinuationPolicy {
        self.policy
    }

    /// Appends a step that runs `task` with no callbacks of its own.
    pub fn add_function(&mut self, task: Task) -> &mut Self {
        self.add_executor(Executor::new(task))
    }

    /// Appends a step. This may be an [`Executor`] or another `CompositeExecutor`.
    pub fn add_executor(&mut self, unit: impl ExecutionUnit + 'static) -> &mut Self {
        self.queue.push(Box::new(unit));
        self
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Starts the first step. Does nothing if the chain is empty.
    ///
    /// Must be called from within a tokio [`LocalSet`](tokio::task::LocalSet).
    pub fn run(self, cx: &ExecutionContext) {
        if self.queue.is_empty() {
            debug!("composite executor is empty, nothing to run");
            return;
        }
        Box::new(self).start(cx.clone(), Box::new(|_| {}));
    }
}

impl fmt::Debug for CompositeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeExecutor")
            .field("len", &self.queue.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ExecutionUnit for CompositeExecutor {
    fn start(self: Box<Self>, cx: ExecutionContext, done: Completion) {
        let CompositeExecutor {
            queue,
            policy,
            on_success,
            on_exception,
        } = *self;

        let finish: Completion = Box::new(move |result: UnitResult| {
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
        });
        advance(queue.into_iter(), policy, cx, finish);
    }
}

fn advance(
    mut rest: vec::IntoIter<Box<dyn ExecutionUnit>>,
    policy: ContinuationPolicy,
    cx: ExecutionContext,
    finish: Completion,
) {
    let Some(unit) = rest.next() else {
        finish(Ok(()));
        return;
    };

    let next_cx = cx.clone();
    unit.start(
        cx,
        Box::new(move |result| match (result, policy) {
            (Ok(()), _) | (Err(_), ContinuationPolicy::ContinueOnException) => {
                advance(rest, policy, next_cx, finish)
            }
            (Err(ex), ContinuationPolicy::AbortOnException) => {
                debug!(skipped = rest.len(), "aborting chain: {ex}");
                finish(Err(ex));
            }
        }),
    );
}
