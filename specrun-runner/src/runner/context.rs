// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ExecutionUnit, LocationStrategy, RecordPolicy, RunOptions, UnitResult};
use crate::{errors::RunError, task::TaskContext};
use std::{
    cell::{RefCell, RefMut},
    rc::Rc,
};
use tokio::{sync::oneshot, task::LocalSet};

/// Per-run state threaded through every executor in a run.
///
/// This is a cheap, cloneable handle. It owns the [`TaskContext`] carrying the two-pass recovery
/// flags, so those flags are scoped to one run rather than to the process. Only one task is in
/// flight at a time, which is what makes sharing a single `TaskContext` sound.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    inner: Rc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    options: RunOptions,
    task_cx: RefCell<TaskContext>,
}

impl ExecutionContext {
    /// Creates a new context with the given options.
    pub fn new(options: RunOptions) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                options,
                task_cx: RefCell::new(TaskContext::default()),
            }),
        }
    }

    /// Returns the options for this run.
    pub fn options(&self) -> RunOptions {
        self.inner.options
    }

    /// Returns the location strategy for this run.
    pub fn location_strategy(&self) -> LocationStrategy {
        self.inner.options.location_strategy
    }

    /// Returns the record policy for this run.
    pub fn record_policy(&self) -> RecordPolicy {
        self.inner.options.record_policy
    }

    /// Runs `unit` to completion on a fresh `LocalSet`, returning its aggregate result.
    ///
    /// Must be awaited from within a tokio runtime. Everything runs on the current thread.
    pub async fn drive<U>(&self, unit: U) -> Result<UnitResult, RunError>
    where
        U: ExecutionUnit + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let cx = self.clone();
        LocalSet::new()
            .run_until(async move {
                Box::new(unit).start(
                    cx,
                    Box::new(move |result| {
                        // Failure to send means the caller stopped waiting.
                        let _ = sender.send(result);
                    }),
                );
                receiver.await.map_err(|_| RunError::Abandoned)
            })
            .await
    }

    pub(super) fn task_cx(&self) -> RefMut<'_, TaskContext> {
        self.inner.task_cx.borrow_mut()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(RunOptions::default())
    }
}
