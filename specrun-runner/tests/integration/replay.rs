// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::Result;
use pretty_assertions::assert_eq;
use specrun_runner::{
    assertion::AssertionFailure,
    outcome::{ClassifiedException, ExceptionKind},
    runner::{LocationStrategy, RecordPolicy, RunOptions, Runner},
    suite::{Example, Spec},
    task::{Task, TaskContext, TaskResult},
};
use std::{cell::Cell, rc::Rc};

fn replay_options() -> RunOptions {
    RunOptions {
        location_strategy: LocationStrategy::RecoverByReplay,
        record_policy: RecordPolicy::Last,
    }
}

fn counting(runs: &Rc<Cell<usize>>, idempotent: bool) -> Task {
    let runs = runs.clone();
    let body = move |cx: &mut TaskContext| -> TaskResult {
        runs.set(runs.get() + 1);
        cx.assert_eq(&3, &4);
        Ok(())
    };
    if idempotent {
        Task::idempotent(body)
    } else {
        Task::new(body)
    }
}

fn only_example(runner: &Runner) -> &Example {
    runner
        .specs()
        .flat_map(|spec| spec.examples())
        .next()
        .expect("one example")
}

#[tokio::test]
async fn idempotent_failure_is_replayed_once() -> Result<()> {
    let runs = Rc::new(Cell::new(0));
    let reporter = RecordingReporter::default();
    let runner = Runner::new(
        [Spec::builder("replay")
            .example("mismatch", counting(&runs, true))
            .build()],
        reporter.clone(),
    )
    .with_options(replay_options());
    runner.run().await?;

    assert_eq!(runs.get(), 2, "executed once more to recover the location");
    let example = only_example(&runner);
    assert_eq!(example.exceptions().len(), 1, "one merged exception");

    let ex = example.exception().expect("recorded");
    assert_eq!(ex.kind, ExceptionKind::Failure);
    assert_eq!(ex.message, "expected 3, actual 4");
    let location = ex.location.expect("location from the second pass");
    assert!(location.file.ends_with("replay.rs"), "location: {location}");

    assert_eq!(
        reporter.count(|event| matches!(event, Event::ExampleEnd(_))),
        1
    );
    Ok(())
}

#[tokio::test]
async fn run_once_failure_has_no_location() -> Result<()> {
    let runs = Rc::new(Cell::new(0));
    let runner = Runner::new(
        [Spec::builder("replay")
            .example("mismatch", counting(&runs, false))
            .build()],
        RecordingReporter::default(),
    )
    .with_options(replay_options());
    runner.run().await?;

    assert_eq!(runs.get(), 1);
    assert_eq!(
        only_example(&runner).exception(),
        Some(ClassifiedException::failure("expected 3, actual 4", None))
    );
    Ok(())
}

#[tokio::test]
async fn immediate_strategy_never_replays() -> Result<()> {
    let runs = Rc::new(Cell::new(0));
    let runner = Runner::new(
        [Spec::builder("immediate")
            .example("mismatch", counting(&runs, true))
            .build()],
        RecordingReporter::default(),
    );
    runner.run().await?;

    assert_eq!(runs.get(), 1);
    let ex = only_example(&runner).exception().expect("recorded");
    assert!(ex.is_failure());
    assert!(ex.location.is_some());
    Ok(())
}

#[test]
fn flags_do_not_leak_into_next_task() -> Result<()> {
    for options in [RunOptions::default(), replay_options()] {
        let runs = Rc::new(Cell::new(0));
        let runner = Runner::new(
            [Spec::builder("leaks")
                .example("mismatch", counting(&runs, true))
                .example(
                    "swallows",
                    Task::new(|cx| {
                        // Flag a failure without raising it.
                        cx.flag_failure(AssertionFailure::new("ignored"));
                        Ok(())
                    }),
                )
                .example("crashes", Task::new(|_| panic!("unexpected state")))
                .build()],
            RecordingReporter::default(),
        )
        .with_options(options);
        runner.run_blocking()?;

        let kinds: Vec<_> = runner
            .specs()
            .flat_map(|spec| spec.examples())
            .map(|example| example.exception().map(|ex| ex.kind))
            .collect();
        assert_eq!(
            kinds,
            [Some(ExceptionKind::Failure), None, Some(ExceptionKind::Error)],
            "options: {options:?}"
        );
    }
    Ok(())
}
