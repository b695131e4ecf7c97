// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

// ---
// Composition laws, checked over arbitrary chains. Each case builds a fresh runtime because the
// engine runs on a single-threaded LocalSet.
// ---

use crate::fixtures::*;
use proptest::prelude::*;
use specrun_runner::{
    outcome::ClassifiedException,
    runner::{
        CompositeExecutor, ContinuationPolicy, ExecutionContext, Executor, Runner, UnitResult,
    },
    suite::{RunState, Spec},
    task::Task,
};
use std::{cell::RefCell, rc::Rc};
use test_strategy::proptest;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime is created")
        .block_on(future)
}

#[derive(Default)]
struct ChainLog {
    ran: Vec<usize>,
    callbacks: Vec<usize>,
}

fn chain(
    fails: &[bool],
    policy: ContinuationPolicy,
    log: &Rc<RefCell<ChainLog>>,
) -> CompositeExecutor {
    let mut composite = CompositeExecutor::new(policy);
    for (index, &fail) in fails.iter().enumerate() {
        let task = Task::new({
            let log = log.clone();
            move |_| {
                log.borrow_mut().ran.push(index);
                if fail {
                    return Err(format!("step {index} failed").into());
                }
                Ok(())
            }
        });
        let on_success = {
            let log = log.clone();
            move || log.borrow_mut().callbacks.push(index)
        };
        let on_exception = {
            let log = log.clone();
            move |_: &ClassifiedException| log.borrow_mut().callbacks.push(index)
        };
        composite.add_executor(
            Executor::new(task)
                .on_success(on_success)
                .on_exception(on_exception),
        );
    }
    composite
}

fn drive(composite: CompositeExecutor) -> UnitResult {
    block_on(ExecutionContext::default().drive(composite)).expect("chain completed")
}

#[proptest(cases = 64)]
fn continue_runs_every_step(
    #[strategy(prop::collection::vec(any::<bool>(), 0..12))] fails: Vec<bool>,
) {
    let log: Rc<RefCell<ChainLog>> = Rc::default();
    let result = drive(chain(&fails, ContinuationPolicy::ContinueOnException, &log));

    let all: Vec<_> = (0..fails.len()).collect();
    let log = log.borrow();
    prop_assert_eq!(&log.ran, &all);
    prop_assert_eq!(&log.callbacks, &all);
    prop_assert!(result.is_ok());
}

#[proptest(cases = 64)]
fn abort_stops_at_first_failure(
    #[strategy(prop::collection::vec(any::<bool>(), 0..12))] fails: Vec<bool>,
) {
    let log: Rc<RefCell<ChainLog>> = Rc::default();
    let result = drive(chain(&fails, ContinuationPolicy::AbortOnException, &log));

    let log = log.borrow();
    match fails.iter().position(|&fail| fail) {
        Some(first) => {
            let expected: Vec<_> = (0..=first).collect();
            prop_assert_eq!(&log.ran, &expected);
            prop_assert_eq!(&log.callbacks, &expected);
            let ex = result.expect_err("chain aborted");
            prop_assert_eq!(ex.message, format!("step {first} failed"));
        }
        None => {
            prop_assert_eq!(log.ran.len(), fails.len());
            prop_assert!(result.is_ok());
        }
    }
}

#[proptest(cases = 32)]
fn example_starts_match_examples(
    #[strategy(prop::collection::vec((any::<bool>(), 0usize..4), 0..5))] specs: Vec<(bool, usize)>,
) {
    let reporter = RecordingReporter::default();
    let runner = Runner::new(
        specs.iter().enumerate().map(|(index, &(setup_fails, examples))| {
            let before_all = if setup_fails {
                Task::new(|_| Err("setup failed".into()))
            } else {
                Task::noop()
            };
            (0..examples).fold(
                Spec::builder(format!("spec {index}")).before_all(before_all),
                |builder, n| builder.example(format!("example {n}"), Task::noop()),
            )
            .build()
        }),
        reporter.clone(),
    );
    let stats = runner.run_blocking().expect("run completed");

    let expected_starts: usize = specs
        .iter()
        .filter(|(setup_fails, _)| !setup_fails)
        .map(|(_, examples)| examples)
        .sum();
    let starts = reporter.count(|event| matches!(event, Event::ExampleStart(_)));
    let ends = reporter.count(|event| matches!(event, Event::ExampleEnd(_)));
    prop_assert_eq!(starts, expected_starts);
    prop_assert_eq!(ends, expected_starts);
    let spec_ends = reporter.count(|event| matches!(event, Event::SpecEnd(_)));
    prop_assert_eq!(spec_ends, specs.len());
    prop_assert_eq!(stats.finished, expected_starts);

    // Finished examples have an outcome, skipped ones don't.
    for example in runner.specs().flat_map(|spec| spec.examples()) {
        let finished = example.state() == RunState::Finished;
        prop_assert_eq!(example.outcome().is_some(), finished);
    }
}
