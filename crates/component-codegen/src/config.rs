//! Generator configuration.
//!
//! Options arrive as JSON from the build pipeline and select the target
//! platform plus the modules that emitted code imports its boilerplate from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),
    #[error("failed to parse generator options: {0}")]
    Json(#[from] serde_json::Error),
}

/// A supported target framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    #[default]
    React,
    Angular,
    Vue,
    Preact,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Self::React, Self::Angular, Self::Vue, Self::Preact];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Angular => "angular",
            Self::Vue => "vue",
            Self::Preact => "preact",
        }
    }

    /// Only Preact output registers itself as a jQuery widget.
    pub fn supports_jquery(&self) -> bool {
        matches!(self, Self::Preact)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "react" => Ok(Self::React),
            "angular" => Ok(Self::Angular),
            "vue" => Ok(Self::Vue),
            "preact" => Ok(Self::Preact),
            other => Err(ConfigError::InvalidPlatform(other.to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

/// Options for a generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Target framework.
    #[serde(default)]
    pub platform: Platform,
    /// Module providing default-options helpers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_options_module: Option<String>,
    /// Module registering generated components as jQuery widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jquery_component_registrator_module: Option<String>,
    /// Base class module for generated jQuery widgets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jquery_base_component_module: Option<String>,
    /// Path of the TypeScript configuration to compile against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_config: Option<String>,
}

impl GeneratorOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Parse options from JSON, rejecting unknown platforms.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options.normalized())
    }

    /// Overlay `other` on top of these options. Fields set in `other` win.
    pub fn merge(mut self, other: GeneratorOptions) -> Self {
        self.platform = other.platform;
        if other.default_options_module.is_some() {
            self.default_options_module = other.default_options_module;
        }
        if other.jquery_component_registrator_module.is_some() {
            self.jquery_component_registrator_module = other.jquery_component_registrator_module;
        }
        if other.jquery_base_component_module.is_some() {
            self.jquery_base_component_module = other.jquery_base_component_module;
        }
        if other.ts_config.is_some() {
            self.ts_config = other.ts_config;
        }
        self.normalized()
    }

    /// Drop settings the selected platform cannot use.
    pub fn normalized(mut self) -> Self {
        if !self.platform.supports_jquery() {
            self.jquery_component_registrator_module = None;
            self.jquery_base_component_module = None;
        }
        self
    }
}
