// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classified results of running a [`Task`](crate::task::Task).

use std::{fmt, panic::Location};

/// A position in a source file, as reported by the panic hook.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SourceLocation {
    /// The file the exception was raised in.
    pub file: String,

    /// The 1-based line number.
    pub line: u32,

    /// The 1-based column number.
    pub column: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The kind of a classified exception.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExceptionKind {
    /// An assertion explicitly signaled a mismatch.
    Failure,

    /// Any other raised exception.
    Error,
}

impl ExceptionKind {
    /// Returns the string form of this kind, `"failure"` or `"error"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ExceptionKind::Failure => "failure",
            ExceptionKind::Error => "error",
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An exception raised by a task, after classification.
///
/// Exactly one of these is produced per failing task execution. With
/// [`RecoverByReplay`](crate::runner::LocationStrategy::RecoverByReplay), the message comes from
/// the first pass and the location from the second.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassifiedException {
    /// Whether this is an assertion failure or an error.
    pub kind: ExceptionKind,

    /// The human-readable explanation.
    pub message: String,

    /// Where the exception was raised, if known.
    pub location: Option<SourceLocation>,
}

impl ClassifiedException {
    /// Creates a new assertion failure.
    pub fn failure(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            kind: ExceptionKind::Failure,
            message: message.into(),
            location,
        }
    }

    /// Creates a new error.
    pub fn error(message: impl Into<String>, location: Option<SourceLocation>) -> Self {
        Self {
            kind: ExceptionKind::Error,
            message: message.into(),
            location,
        }
    }

    /// Returns true if this is an assertion failure.
    pub fn is_failure(&self) -> bool {
        self.kind == ExceptionKind::Failure
    }

    /// Returns true if this is an error.
    pub fn is_error(&self) -> bool {
        self.kind == ExceptionKind::Error
    }

    /// Converts this exception into the corresponding [`Outcome`].
    pub fn to_outcome(&self) -> Outcome {
        match self.kind {
            ExceptionKind::Failure => Outcome::Failure {
                message: self.message.clone(),
                location: self.location.clone(),
            },
            ExceptionKind::Error => Outcome::Error {
                message: self.message.clone(),
                location: self.location.clone(),
            },
        }
    }
}

impl fmt::Display for ClassifiedException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        Ok(())
    }
}

/// The recorded result of running an example.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every stage completed without raising.
    Success,

    /// An assertion did not hold.
    Failure {
        /// The assertion's explanation.
        message: String,
        /// Where the assertion was raised, if known.
        location: Option<SourceLocation>,
    },

    /// An unanticipated exception was raised.
    Error {
        /// Best-effort description of the exception.
        message: String,
        /// Where the exception was raised, if known.
        location: Option<SourceLocation>,
    },
}

impl Outcome {
    /// Returns true if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Returns the message for failures and errors.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { message, .. } | Outcome::Error { message, .. } => Some(message),
        }
    }

    /// Returns the location for failures and errors, if known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { location, .. } | Outcome::Error { location, .. } => {
                location.as_ref()
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.pad("PASS"),
            Outcome::Failure { .. } => f.pad("FAIL"),
            Outcome::Error { .. } => f.pad("ERROR"),
        }
    }
}
