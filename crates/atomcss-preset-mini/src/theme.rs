//! Default theme of the mini preset.
//!
//! Copyright (c) 2025 Posit, PBC

use atomcss_core::Theme;
use once_cell::sync::Lazy;

/// The embedded default theme, parsed on first use.
///
/// # Panics
///
/// Panics if the embedded JSON does not describe a theme. This can only
/// happen if `resources/theme.json` is edited incorrectly.
pub static DEFAULT_THEME: Lazy<Theme> = Lazy::new(|| {
    let json_data = include_str!("../resources/theme.json");
    serde_json::from_str(json_data).expect("Invalid default theme JSON - this is a bug in atomcss")
});

/// A copy of the default theme, ready to be merged into.
pub fn default_theme() -> Theme {
    DEFAULT_THEME.clone()
}
