// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::Result;
use pretty_assertions::assert_eq;
use specrun_runner::{
    errors::RunError,
    runner::{
        Completion, CompositeExecutor, ContinuationPolicy, ExecutionContext, ExecutionUnit,
    },
};
use std::{cell::Cell, rc::Rc};
use tokio::task::LocalSet;

/// A unit that drops its continuation without completing.
struct Forgetful;

impl ExecutionUnit for Forgetful {
    fn start(self: Box<Self>, _cx: ExecutionContext, done: Completion) {
        drop(done);
    }
}

#[tokio::test]
async fn dropped_continuation_is_abandoned() {
    let mut composite = CompositeExecutor::new(ContinuationPolicy::ContinueOnException);
    composite.add_executor(Forgetful);

    let err = ExecutionContext::default()
        .drive(composite)
        .await
        .expect_err("chain never completes");
    assert!(matches!(err, RunError::Abandoned), "{err:?}");
}

#[tokio::test]
async fn top_level_run_starts_chain() -> Result<()> {
    let log = TaskLog::default();
    let finished = Rc::new(Cell::new(false));

    let mut composite = CompositeExecutor::new(ContinuationPolicy::AbortOnException).on_success({
        let finished = finished.clone();
        move || finished.set(true)
    });
    composite
        .add_function(log.task("first"))
        .add_function(log.task("second"));
    assert_eq!(composite.len(), 2);

    let local = LocalSet::new();
    local.run_until(async {
        composite.run(&ExecutionContext::default());
        assert!(log.entries().is_empty(), "nothing runs inline");
    })
    .await;
    local.await;

    assert_eq!(log.entries(), ["first", "second"]);
    assert!(finished.get());
    Ok(())
}

#[tokio::test]
async fn empty_chains() -> Result<()> {
    let finished = Rc::new(Cell::new(0));
    let make = || {
        let finished = finished.clone();
        CompositeExecutor::new(ContinuationPolicy::AbortOnException)
            .on_success(move || finished.set(finished.get() + 1))
    };

    // A top-level run of an empty chain does nothing at all.
    let local = LocalSet::new();
    let empty = make();
    assert!(empty.is_empty());
    local.run_until(async { empty.run(&ExecutionContext::default()) }).await;
    local.await;
    assert_eq!(finished.get(), 0);

    // A driven or nested empty chain completes so its parent can advance.
    let result = ExecutionContext::default().drive(make()).await?;
    assert_eq!(result, Ok(()));
    assert_eq!(finished.get(), 1);
    Ok(())
}
