//! Stylesheet text for resolved utilities.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fmt::Write;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::resolver::ResolvedUtility;

/// Layer used by entries that do not name one.
pub const DEFAULT_LAYER: &str = "default";

/// Escape a token for use as a class selector.
///
/// Characters outside `[A-Za-z0-9_-]` are backslash-escaped, a leading
/// digit (or a digit after a leading `-`) becomes a hex escape, and
/// control characters are hex-escaped.
pub fn escape_selector(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 4);
    let starts_with_dash = token.starts_with('-');
    for (i, c) in token.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            c if c.is_control() => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            '0'..='9' if i == 0 || (i == 1 && starts_with_dash) => {
                let _ = write!(out, "\\{:x} ", c as u32);
            }
            '-' if i == 0 && token.len() == 1 => out.push_str("\\-"),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() => {
                out.push(c)
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Render utilities as CSS rules grouped by layer.
///
/// Layers appear in order of first use. Within a layer, rules are ordered by
/// `sort` and then by input order. Each layer starts with a
/// `/* layer: name */` comment.
pub fn to_css(utilities: &[Arc<ResolvedUtility>]) -> String {
    let mut layers: IndexMap<&str, Vec<&ResolvedUtility>> = IndexMap::new();
    for utility in utilities {
        let layer = utility.meta.layer.as_deref().unwrap_or(DEFAULT_LAYER);
        layers.entry(layer).or_default().push(utility);
    }

    let mut lines = Vec::new();
    for (layer, mut members) in layers {
        members.sort_by_key(|u| u.meta.sort);
        lines.push(format!("/* layer: {} */", layer));
        for utility in members {
            lines.push(format!(
                ".{}{{{}}}",
                escape_selector(&utility.token),
                utility.declarations
            ));
        }
    }
    lines.join("\n")
}
