//! Minimal preset for atomcss
//!
//! Provides the outline, appearance and will-change rule families together
//! with a default theme (`lineWidth` and a small `colors` palette).
//!
//! # Example
//!
//! ```
//! use atomcss_core::{Resolver, ResolverConfig};
//!
//! let preset = atomcss_preset_mini::preset_mini().unwrap();
//! let resolver = Resolver::new(ResolverConfig::new().with_preset(preset));
//!
//! let utility = resolver.resolve("outline-offset-4").unwrap();
//! assert_eq!(utility.declarations.get("outline-offset"), Some("4px"));
//! ```

pub mod rules;
pub mod theme;

pub use theme::{DEFAULT_THEME, default_theme};

use atomcss_core::Preset;

/// Name under which the preset is registered.
pub const PRESET_NAME: &str = "mini";

/// Build the preset: its rules in precedence order and the default theme.
pub fn preset_mini() -> atomcss_core::Result<Preset> {
    let rules = rules::rules()?;
    tracing::debug!(rules = rules.len(), "Built preset {}", PRESET_NAME);
    Ok(Preset::new(PRESET_NAME)
        .with_rules(rules)
        .with_theme(default_theme()))
}
