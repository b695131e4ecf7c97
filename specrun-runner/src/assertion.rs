// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The contract between tasks and assertion helpers.
//!
//! A matcher that decides a value does not match must flag the failure on the [`TaskContext`]
//! and then raise an [`AssertionFailure`] by panicking. The helpers here do both. Richer matcher
//! libraries only need to follow the same two steps, for example by calling
//! [`TaskContext::fail_with`].

use crate::task::TaskContext;
use std::{fmt, panic};

/// A deliberate assertion mismatch, carrying a ready-made explanation.
///
/// This is the panic payload raised by assertion helpers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    /// Creates a new assertion failure with the given explanation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the explanation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes self, returning the explanation.
    pub fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raised in place of an [`AssertionFailure`] while a task is being replayed.
///
/// Only its location matters: the explanation was already captured on the first pass.
#[derive(Debug)]
pub(crate) struct ReplayProbe;

impl TaskContext {
    /// Raises an assertion failure with the given explanation.
    #[track_caller]
    pub fn fail(&mut self, message: impl Into<String>) -> ! {
        let message = message.into();
        self.fail_with(move || message)
    }

    /// Raises an assertion failure, computing the explanation lazily.
    ///
    /// During a replay the explanation is not computed again.
    #[track_caller]
    pub fn fail_with(&mut self, explain: impl FnOnce() -> String) -> ! {
        if self.is_second_pass() {
            panic::panic_any(ReplayProbe);
        }
        let failure = AssertionFailure::new(explain());
        self.flag_failure(failure.clone());
        panic::panic_any(failure)
    }

    /// Asserts that `actual` equals `expected`.
    #[track_caller]
    pub fn assert_eq<T>(&mut self, expected: &T, actual: &T)
    where
        T: PartialEq + fmt::Debug + ?Sized,
    {
        if expected != actual {
            self.fail_with(|| format!("expected {expected:?}, actual {actual:?}"));
        }
    }

    /// Asserts that `actual` does not equal `unexpected`.
    #[track_caller]
    pub fn assert_ne<T>(&mut self, unexpected: &T, actual: &T)
    where
        T: PartialEq + fmt::Debug + ?Sized,
    {
        if unexpected == actual {
            self.fail_with(|| format!("{actual:?} should not be {unexpected:?}"));
        }
    }

    /// Asserts that `condition` holds.
    #[track_caller]
    pub fn ensure(&mut self, condition: bool, explain: impl FnOnce() -> String) {
        if !condition {
            self.fail_with(explain);
        }
    }
}
