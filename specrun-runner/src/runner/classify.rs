// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning whatever a task raised into a [`ClassifiedException`].

use super::{
    ExecutionContext, LocationStrategy, UnitResult,
    panic_hook::{self, CaptureMode},
};
use crate::{
    assertion::AssertionFailure,
    outcome::{ClassifiedException, SourceLocation},
    task::Task,
};
use tracing::{debug, warn};

/// The result of executing a task once.
#[derive(Debug)]
pub(super) enum Attempt {
    /// The task's outcome is final.
    Finished(UnitResult),

    /// The task failed an assertion on its first pass and must be executed again to recover the
    /// assertion's location.
    Replay,
}

struct Raised {
    message: String,
    location: Option<SourceLocation>,
    asserted: bool,
}

impl ExecutionContext {
    /// Executes `task` once and classifies what it raised.
    pub(super) fn attempt(&self, task: &Task) -> Attempt {
        let second_pass = {
            let mut task_cx = self.task_cx();
            if !task_cx.is_second_pass() {
                // A fresh execution never sees flags left behind by an earlier task.
                task_cx.clear();
            }
            task_cx.is_second_pass()
        };

        let mode = match (self.location_strategy(), second_pass) {
            (LocationStrategy::RecoverByReplay, false) => CaptureMode::Silent,
            _ => CaptureMode::Record,
        };

        let raised = match panic_hook::catch(mode, || task.call(&mut self.task_cx())) {
            Ok(Ok(())) => None,
            Ok(Err(error)) => Some(Raised {
                message: error.to_string(),
                location: None,
                asserted: false,
            }),
            Err(caught) => {
                let (message, asserted) = match caught.payload.downcast::<AssertionFailure>() {
                    Ok(failure) => (failure.into_message(), true),
                    Err(payload) => (panic_hook::payload_message(&*payload), false),
                };
                Some(Raised {
                    message,
                    location: caught.location,
                    asserted,
                })
            }
        };

        if second_pass {
            return Attempt::Finished(Err(self.merge_replay(raised)));
        }

        let Some(raised) = raised else {
            self.task_cx().clear();
            return Attempt::Finished(Ok(()));
        };

        let pending = self.task_cx().pending_failure().cloned();
        if pending.is_none() && !raised.asserted {
            self.task_cx().clear();
            return Attempt::Finished(Err(ClassifiedException::error(
                raised.message,
                raised.location,
            )));
        }

        // The flagged explanation wins over whatever the raise itself carried.
        let message = pending.map_or(raised.message, AssertionFailure::into_message);

        match self.location_strategy() {
            LocationStrategy::Immediate => {
                self.task_cx().clear();
                Attempt::Finished(Err(ClassifiedException::failure(
                    message,
                    raised.location,
                )))
            }
            LocationStrategy::RecoverByReplay if task.is_replay_safe() => {
                debug!(%message, "assertion failed without a location, replaying task");
                let mut task_cx = self.task_cx();
                task_cx.flag_failure(AssertionFailure::new(message));
                task_cx.begin_second_pass();
                Attempt::Replay
            }
            LocationStrategy::RecoverByReplay => {
                debug!(%message, "task is not replay-safe, reporting failure without a location");
                self.task_cx().clear();
                Attempt::Finished(Err(ClassifiedException::failure(message, None)))
            }
        }
    }

    fn merge_replay(&self, raised: Option<Raised>) -> ClassifiedException {
        let pending = self.task_cx().clear();
        let message = match (pending, &raised) {
            (Some(failure), _) => failure.into_message(),
            (None, Some(raised)) => raised.message.clone(),
            (None, None) => "assertion failed".to_owned(),
        };

        let location = match raised {
            Some(raised) => raised.location,
            None => {
                warn!(
                    %message,
                    "replayed task completed without raising, reporting failure without a location"
                );
                None
            }
        };
        ClassifiedException::failure(message, location)
    }
}
