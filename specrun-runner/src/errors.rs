// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by specrun.
//!
//! Exceptions raised by tasks are not errors in this sense: they are classified and recorded as
//! [`ClassifiedException`](crate::outcome::ClassifiedException)s.

use crate::runner::{LocationStrategy, RecordPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use config::ConfigError;
use std::io;
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse specrun config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// An error which indicates that a profile was requested but not known to specrun.
#[derive(Clone, Debug, Error)]
#[error("profile `{profile}` not found (known profiles: {})", .all_profiles.join(", "))]
pub struct ProfileNotFound {
    profile: String,
    all_profiles: Vec<String>,
}

impl ProfileNotFound {
    pub(crate) fn new(
        profile: impl Into<String>,
        all_profiles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut all_profiles: Vec<_> = all_profiles.into_iter().map(|s| s.into()).collect();
        all_profiles.sort_unstable();
        Self {
            profile: profile.into(),
            all_profiles,
        }
    }

    /// Returns the name of the profile that was requested.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}

/// Error returned while parsing a [`LocationStrategy`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for location-strategy: {input}\n(known values: {})",
    LocationStrategy::variants().join(", "),
)]
pub struct LocationStrategyParseError {
    input: String,
}

impl LocationStrategyParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Error returned while parsing a [`RecordPolicy`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for record-exception: {input}\n(known values: {})",
    RecordPolicy::variants().join(", "),
)]
pub struct RecordPolicyParseError {
    input: String,
}

impl RecordPolicyParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that prevented a run from completing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The tokio runtime used by [`Runner::run_blocking`](crate::runner::Runner::run_blocking)
    /// could not be created.
    #[error("failed to create the runtime for the run")]
    Runtime(#[source] io::Error),

    /// The execution chain was dropped before it reported completion.
    ///
    /// This happens if a completion callback panics outside of a task.
    #[error("the execution chain was abandoned before completing")]
    Abandoned,
}
