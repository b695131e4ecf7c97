// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::{LocationStrategyParseError, RecordPolicyParseError};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// How the source location of an assertion failure is obtained.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationStrategy {
    /// The panic hook records the location on the first and only execution.
    #[default]
    Immediate,

    /// The location is not observed while a task first runs. A task that fails an assertion is
    /// executed a second time, and the location of the second raise is merged with the
    /// explanation from the first.
    ///
    /// Only tasks declared with [`Task::idempotent`](crate::task::Task::idempotent) are replayed.
    RecoverByReplay,
}

impl LocationStrategy {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["immediate", "recover-by-replay"]
    }
}

impl fmt::Display for LocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationStrategy::Immediate => write!(f, "immediate"),
            LocationStrategy::RecoverByReplay => write!(f, "recover-by-replay"),
        }
    }
}

impl FromStr for LocationStrategy {
    type Err = LocationStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "immediate" => LocationStrategy::Immediate,
            "recover-by-replay" => LocationStrategy::RecoverByReplay,
            other => return Err(LocationStrategyParseError::new(other)),
        };
        Ok(val)
    }
}

/// Which exception an example or spec reports when more than one of its stages raises.
///
/// Every raised exception is kept either way, see
/// [`Example::exceptions`](crate::suite::Example::exceptions).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordPolicy {
    /// A later exception replaces an earlier one, so a failing `after` hook wins over a failing
    /// body.
    #[default]
    Last,

    /// The first exception is kept.
    First,
}

impl RecordPolicy {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["last", "first"]
    }
}

impl fmt::Display for RecordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPolicy::Last => write!(f, "last"),
            RecordPolicy::First => write!(f, "first"),
        }
    }
}

impl FromStr for RecordPolicy {
    type Err = RecordPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "last" => RecordPolicy::Last,
            "first" => RecordPolicy::First,
            other => return Err(RecordPolicyParseError::new(other)),
        };
        Ok(val)
    }
}

/// Options for a run.
///
/// Usually obtained from a [`SpecrunProfile`](crate::config::SpecrunProfile).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunOptions {
    /// How assertion locations are obtained.
    pub location_strategy: LocationStrategy,

    /// Which exception is reported when several stages raise.
    pub record_policy: RecordPolicy,
}
