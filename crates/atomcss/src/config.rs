/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Configuration file loading for the atomcss CLI.
 */

//! Configuration file loading.
//!
//! A configuration file is JSON or YAML (chosen by extension, YAML when
//! unknown) with three optional keys:
//!
//! ```yaml
//! presets: [mini]
//! theme:
//!   lineWidth:
//!     hairline: 0.5px
//! options:
//!   bracket: true
//!   cssvar: false
//! ```
//!
//! Without a file, the `mini` preset is used with default options.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use atomcss_core::{ConfigError, Preset, ResolveOptions, ResolverConfig, Theme};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Preset names in precedence order.
    pub presets: Vec<String>,
    /// User theme, merged over the preset themes.
    pub theme: Theme,
    pub options: ResolveOptions,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            presets: vec![atomcss_preset_mini::PRESET_NAME.to_string()],
            theme: Theme::new(),
            options: ResolveOptions::default(),
        }
    }
}

impl ConfigFile {
    /// Load a configuration file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
        .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), presets = ?config.presets, "Loaded config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty YAML document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Turn preset names into presets and assemble the resolver config.
    ///
    /// The user theme is validated first, so a malformed theme is reported
    /// instead of silently never matching.
    pub fn into_resolver_config(self) -> atomcss_core::Result<ResolverConfig> {
        self.theme.validate()?;
        let mut config = ResolverConfig::new()
            .with_theme(self.theme)
            .with_options(self.options);
        for name in &self.presets {
            config = config.with_preset(preset_by_name(name)?);
        }
        Ok(config)
    }
}

fn preset_by_name(name: &str) -> atomcss_core::Result<Preset> {
    match name {
        atomcss_preset_mini::PRESET_NAME => atomcss_preset_mini::preset_mini(),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}
