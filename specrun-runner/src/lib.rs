// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core engine for specrun.
//!
//! A suite is an ordered list of [`Spec`](suite::Spec)s, each holding an ordered list of
//! [`Example`](suite::Example)s plus `before all`, `before each`, `after each` and `after all`
//! hooks. A [`Runner`](runner::Runner) assembles the suite into a tree of
//! [`CompositeExecutor`](runner::CompositeExecutor)s and drives it on a single-threaded tokio
//! `LocalSet`: every unit of work is deferred to the next scheduling boundary, units never run in
//! parallel, and unit *N+1* never starts before unit *N*'s callbacks have returned.
//!
//! Raised exceptions are classified as either an assertion *failure* or an unexpected *error*.
//! See [`LocationStrategy`](runner::LocationStrategy) for how source locations are recovered.

pub mod assertion;
pub mod config;
pub mod errors;
pub mod outcome;
pub mod output;
pub mod reporter;
pub mod runner;
pub mod suite;
pub mod task;
