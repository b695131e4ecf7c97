// Copyright (c) The specrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for specrun.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind, ProfileNotFound},
    runner::{LocationStrategy, RecordPolicy, RunOptions},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::HashMap;

/// Overall configuration for specrun.
///
/// Most options are managed through [profiles](SpecrunProfile), obtained through the
/// [`profile`](Self::profile) method.
#[derive(Clone, Debug)]
pub struct SpecrunConfig {
    root: Utf8PathBuf,
    inner: SpecrunConfigImpl,
}

impl SpecrunConfig {
    /// The default location of the config within the root directory: `.config/specrun.toml`.
    pub const CONFIG_PATH: &'static str = ".config/specrun.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Project-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// The name of the default profile.
    pub const DEFAULT_PROFILE: &'static str = "default";

    /// Reads the specrun config from the given file, or if not specified from
    /// `.config/specrun.toml` in the root directory.
    ///
    /// If no config file is specified and the root doesn't have `.config/specrun.toml`, uses the
    /// default config options.
    pub fn from_sources(
        root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let root = root.into();
        let inner = Self::read_from_sources(&root, config_file)?;
        Ok(Self { root, inner })
    }

    /// Returns the default specrun config.
    pub fn default_config(root: impl Into<Utf8PathBuf>) -> Self {
        let config = Self::make_default_config()
            .build()
            .expect("default config is always valid");

        let inner = config
            .try_deserialize()
            .expect("default config is always valid");
        Self {
            root: root.into(),
            inner,
        }
    }

    /// Returns the root directory the config was read relative to.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the profile with the given name, or an error if a profile was specified but not
    /// found.
    pub fn profile(&self, name: impl AsRef<str>) -> Result<SpecrunProfile<'_>, ProfileNotFound> {
        let custom_profile = self.inner.profiles.get(name.as_ref())?;
        Ok(SpecrunProfile {
            default_profile: &self.inner.profiles.default,
            custom_profile,
        })
    }

    // ---
    // Helper methods
    // ---

    fn read_from_sources(
        root: &Utf8Path,
        file: Option<&Utf8Path>,
    ) -> Result<SpecrunConfigImpl, ConfigParseError> {
        let (config_file, source) = match file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<SpecrunConfigImpl, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))
    }
}

/// A configuration profile for specrun.
///
/// Returned by [`SpecrunConfig::profile`].
#[derive(Clone, Debug)]
pub struct SpecrunProfile<'cfg> {
    default_profile: &'cfg DefaultProfileImpl,
    custom_profile: Option<&'cfg CustomProfileImpl>,
}

impl SpecrunProfile<'_> {
    /// Returns the location strategy for this profile.
    pub fn location_strategy(&self) -> LocationStrategy {
        self.custom_profile
            .and_then(|profile| profile.location_strategy)
            .unwrap_or(self.default_profile.location_strategy)
    }

    /// Returns the record policy for this profile.
    pub fn record_policy(&self) -> RecordPolicy {
        self.custom_profile
            .and_then(|profile| profile.record_exception)
            .unwrap_or(self.default_profile.record_exception)
    }

    /// Returns the run options for this profile, for use with
    /// [`Runner::with_options`](crate::runner::Runner::with_options).
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            location_strategy: self.location_strategy(),
            record_policy: self.record_policy(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SpecrunConfigImpl {
    #[serde(rename = "profile")]
    profiles: SpecrunProfilesImpl,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SpecrunProfilesImpl {
    default: DefaultProfileImpl,
    #[serde(flatten)]
    other: HashMap<String, CustomProfileImpl>,
}

impl SpecrunProfilesImpl {
    fn get(&self, profile: &str) -> Result<Option<&CustomProfileImpl>, ProfileNotFound> {
        let custom_profile = match profile {
            SpecrunConfig::DEFAULT_PROFILE => None,
            other => Some(
                self.other
                    .get(other)
                    .ok_or_else(|| ProfileNotFound::new(profile, self.all_profiles()))?,
            ),
        };
        Ok(custom_profile)
    }

    fn all_profiles(&self) -> impl Iterator<Item = &str> {
        self.other
            .keys()
            .map(|key| key.as_str())
            .chain(std::iter::once(SpecrunConfig::DEFAULT_PROFILE))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultProfileImpl {
    location_strategy: LocationStrategy,
    record_exception: RecordPolicy,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CustomProfileImpl {
    #[serde(default)]
    location_strategy: Option<LocationStrategy>,
    #[serde(default)]
    record_exception: Option<RecordPolicy>,
}
