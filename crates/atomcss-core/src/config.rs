//! Resolver configuration: options, presets and user rules.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Everything a resolver needs is passed in explicitly through
//! [`ResolverConfig`]; there is no process-wide registry, so independent
//! resolvers (one per test, one per build configuration) never see each
//! other's rules.
//!
//! # Precedence
//!
//! Rules: user rules first, then each preset's rules in the order the
//! presets were added. Themes: preset themes are deep-merged in order and
//! the user theme is merged last, so user values win.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;
use crate::rule::RuleEntry;
use crate::theme::Theme;

/// Per-resolution switches visible to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Accept `[...]` arbitrary values.
    pub bracket: bool,
    /// Accept `$name` css-variable shorthands.
    pub cssvar: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            bracket: true,
            cssvar: true,
        }
    }
}

/// A named, reusable bundle of rules and theme values.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub name: String,
    pub rules: Vec<RuleEntry>,
    pub theme: Theme,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleEntry>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme.merge(&theme);
        self
    }
}

/// Complete input for building a [`crate::Resolver`].
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// User rules, tried before any preset rule.
    pub rules: Vec<RuleEntry>,
    /// Presets in precedence order.
    pub presets: Vec<Preset>,
    /// User theme, merged over the preset themes.
    pub theme: Theme,
    pub options: ResolveOptions,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleEntry>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme.merge(&theme);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Names of the configured presets, in order.
    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name.as_str()).collect()
    }

    /// The registry in precedence order: user rules, then presets.
    pub fn build_registry(&self) -> Registry {
        let mut registry = Registry::new();
        registry.register(self.rules.iter().cloned());
        for preset in &self.presets {
            registry.register(preset.rules.iter().cloned());
        }
        registry
    }

    /// The merged theme: presets in order, then the user theme.
    pub fn build_theme(&self) -> Theme {
        let mut theme = Theme::new();
        for preset in &self.presets {
            theme.merge(&preset.theme);
        }
        theme.merge(&self.theme);
        theme
    }
}
