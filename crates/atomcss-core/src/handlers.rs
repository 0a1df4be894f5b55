//! Value handler combinators.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Each handler turns a raw captured string into a CSS value, or returns
//! `None` to say "not mine, try the next one". Handlers compose with
//! first-defined-wins semantics:
//!
//! ```
//! use atomcss_core::handlers::{bracket, cssvar, px};
//!
//! let value = |raw: &str| bracket(raw).or_else(|| cssvar(raw)).or_else(|| px(raw));
//! assert_eq!(value("[10px]").as_deref(), Some("10px"));
//! assert_eq!(value("$gap").as_deref(), Some("var(--gap)"));
//! assert_eq!(value("4").as_deref(), Some("4px"));
//! assert_eq!(value("wide"), None);
//! ```
//!
//! The same composition is available as data through [`Chain`], which also
//! honours the per-resolution [`ResolveOptions`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ResolveOptions;

/// A number optionally followed by a CSS length unit. Group 1 is the
/// number, group 2 the unit.
static NUMBER_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(-?[0-9.]+)(px|pt|pc|rem|em|%|vh|vw|in|cm|mm|ex|ch|vmin|vmax|rpx)?$")
        .unwrap()
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9.]+$").unwrap());

/// CSS-wide keywords.
pub const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "revert", "revert-layer", "unset"];

// Sorted for binary_search
const CSS_PROPERTIES: &[&str] = &[
    "accent-color", "align-content", "align-items", "align-self", "all", "animation",
    "animation-delay", "animation-direction", "animation-duration", "animation-fill-mode",
    "animation-iteration-count", "animation-name", "animation-play-state",
    "animation-timing-function", "appearance", "aspect-ratio", "backdrop-filter",
    "backface-visibility", "background", "background-attachment", "background-blend-mode",
    "background-clip", "background-color", "background-image", "background-origin",
    "background-position", "background-repeat", "background-size", "block-size", "border",
    "border-block", "border-bottom", "border-bottom-color", "border-bottom-left-radius",
    "border-bottom-right-radius", "border-bottom-style", "border-bottom-width",
    "border-collapse", "border-color", "border-image", "border-inline", "border-left",
    "border-left-color", "border-left-style", "border-left-width", "border-radius",
    "border-right", "border-right-color", "border-right-style", "border-right-width",
    "border-spacing", "border-style", "border-top", "border-top-color",
    "border-top-left-radius", "border-top-right-radius", "border-top-style", "border-top-width",
    "border-width", "bottom", "box-decoration-break", "box-shadow", "box-sizing", "break-after",
    "break-before", "break-inside", "caption-side", "caret-color", "clear", "clip", "clip-path",
    "color", "column-count", "column-fill", "column-gap", "column-rule", "column-span",
    "column-width", "columns", "contain", "container", "content", "content-visibility",
    "counter-increment", "counter-reset", "cursor", "direction", "display", "empty-cells",
    "filter", "flex", "flex-basis", "flex-direction", "flex-flow", "flex-grow", "flex-shrink",
    "flex-wrap", "float", "font", "font-family", "font-feature-settings", "font-kerning",
    "font-size", "font-size-adjust", "font-stretch", "font-style", "font-variant",
    "font-variant-numeric", "font-weight", "gap", "grid", "grid-area", "grid-auto-columns",
    "grid-auto-flow", "grid-auto-rows", "grid-column", "grid-column-end", "grid-column-start",
    "grid-row", "grid-row-end", "grid-row-start", "grid-template", "grid-template-areas",
    "grid-template-columns", "grid-template-rows", "height", "hyphens", "image-rendering",
    "inline-size", "inset", "isolation", "justify-content", "justify-items", "justify-self",
    "left", "letter-spacing", "line-height", "list-style", "list-style-image",
    "list-style-position", "list-style-type", "margin", "margin-block", "margin-bottom",
    "margin-inline", "margin-left", "margin-right", "margin-top", "mask", "max-height",
    "max-width", "min-height", "min-width", "mix-blend-mode", "object-fit", "object-position",
    "opacity", "order", "outline", "outline-color", "outline-offset", "outline-style",
    "outline-width", "overflow", "overflow-wrap", "overflow-x", "overflow-y",
    "overscroll-behavior", "padding", "padding-block", "padding-bottom", "padding-inline",
    "padding-left", "padding-right", "padding-top", "perspective", "perspective-origin",
    "place-content", "place-items", "place-self", "pointer-events", "position", "quotes",
    "resize", "right", "rotate", "row-gap", "scale", "scroll-behavior", "scroll-margin",
    "scroll-padding", "scroll-snap-align", "scroll-snap-type", "tab-size", "table-layout",
    "text-align", "text-decoration", "text-decoration-color", "text-decoration-line",
    "text-decoration-style", "text-decoration-thickness", "text-indent", "text-overflow",
    "text-shadow", "text-transform", "text-underline-offset", "top", "touch-action",
    "transform", "transform-origin", "transform-style", "transition", "transition-delay",
    "transition-duration", "transition-property", "transition-timing-function", "translate",
    "unicode-bidi", "user-select", "vertical-align", "visibility", "white-space", "width",
    "will-change", "word-break", "word-spacing", "writing-mode", "z-index",
];

/// Format a number the way it should appear in CSS: at most ten decimals,
/// no trailing zeros, no negative zero.
pub fn format_number(n: f64) -> String {
    let fixed = format!("{:.10}", n);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn with_default_unit(raw: &str, default_unit: &str) -> Option<String> {
    if raw.eq_ignore_ascii_case(default_unit) {
        return Some(format!("1{}", default_unit));
    }
    let captures = NUMBER_WITH_UNIT.captures(raw)?;
    let n = parse_number(captures.get(1)?.as_str())?;
    let unit = captures.get(2).map_or(default_unit, |m| m.as_str());
    Some(format!("{}{}", format_number(n), unit))
}

/// `[...]` → the inner literal, verbatim.
pub fn bracket(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner.to_string())
    }
}

/// `$name` → `var(--name)`.
pub fn cssvar(raw: &str) -> Option<String> {
    let name = raw.strip_prefix('$')?;
    (!name.is_empty() && !name.contains(char::is_whitespace)).then(|| format!("var(--{})", name))
}

/// A bare number, normalized.
pub fn number(raw: &str) -> Option<String> {
    if !NUMBER.is_match(raw) {
        return None;
    }
    parse_number(raw).map(format_number)
}

/// A bare number gets `px`; a number that already carries a length unit
/// passes through unchanged.
pub fn px(raw: &str) -> Option<String> {
    with_default_unit(raw, "px")
}

/// Like [`px`] with `rem` as the default unit.
pub fn rem(raw: &str) -> Option<String> {
    with_default_unit(raw, "rem")
}

/// `50` or `50%` → `0.5`.
pub fn percent(raw: &str) -> Option<String> {
    let digits = raw.strip_suffix('%').unwrap_or(raw);
    if !NUMBER.is_match(digits) {
        return None;
    }
    parse_number(digits).map(|n| format_number(n / 100.0))
}

/// `1/2` → `50%`, `full` → `100%`.
pub fn fraction(raw: &str) -> Option<String> {
    if raw == "full" {
        return Some("100%".to_string());
    }
    let (numerator, denominator) = raw.split_once('/')?;
    let numerator = parse_number(numerator)?;
    let denominator = parse_number(denominator)?;
    if denominator == 0.0 {
        return None;
    }
    Some(format!("{}%", format_number(numerator / denominator * 100.0)))
}

/// `auto` (or its short alias `a`) → `auto`.
pub fn auto(raw: &str) -> Option<String> {
    matches!(raw, "auto" | "a").then(|| "auto".to_string())
}

/// A CSS-wide keyword, unchanged.
pub fn global(raw: &str) -> Option<String> {
    GLOBAL_KEYWORDS.contains(&raw).then(|| raw.to_string())
}

/// A comma-separated list of known CSS property names, unchanged.
pub fn properties(raw: &str) -> Option<String> {
    raw.split(',')
        .all(is_css_property)
        .then(|| raw.to_string())
}

pub fn is_css_property(name: &str) -> bool {
    CSS_PROPERTIES.binary_search(&name).is_ok()
}

/// A named value handler, so chains can be described as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueHandler {
    Bracket,
    CssVar,
    Number,
    Px,
    Rem,
    Percent,
    Fraction,
    Auto,
    Global,
    Properties,
}

impl ValueHandler {
    pub fn apply(self, raw: &str) -> Option<String> {
        match self {
            ValueHandler::Bracket => bracket(raw),
            ValueHandler::CssVar => cssvar(raw),
            ValueHandler::Number => number(raw),
            ValueHandler::Px => px(raw),
            ValueHandler::Rem => rem(raw),
            ValueHandler::Percent => percent(raw),
            ValueHandler::Fraction => fraction(raw),
            ValueHandler::Auto => auto(raw),
            ValueHandler::Global => global(raw),
            ValueHandler::Properties => properties(raw),
        }
    }

    /// Whether the resolution options allow this handler to run.
    pub fn is_enabled(self, options: &ResolveOptions) -> bool {
        match self {
            ValueHandler::Bracket => options.bracket,
            ValueHandler::CssVar => options.cssvar,
            _ => true,
        }
    }
}

/// An ordered list of handlers evaluated with first-defined-wins semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain(&'static [ValueHandler]);

impl Chain {
    pub const fn new(handlers: &'static [ValueHandler]) -> Self {
        Self(handlers)
    }

    pub fn handlers(&self) -> &'static [ValueHandler] {
        self.0
    }

    pub fn apply(&self, raw: &str) -> Option<String> {
        self.0.iter().find_map(|h| h.apply(raw))
    }

    /// Like [`Chain::apply`], skipping handlers the options disable.
    pub fn apply_with(&self, raw: &str, options: &ResolveOptions) -> Option<String> {
        self.0
            .iter()
            .filter(|h| h.is_enabled(options))
            .find_map(|h| h.apply(raw))
    }
}

/// Bracket literal, else css variable, else a px-normalized number.
pub const BRACKET_CSSVAR_PX: Chain = Chain::new(&[
    ValueHandler::Bracket,
    ValueHandler::CssVar,
    ValueHandler::Px,
]);

/// Property list, else `auto`, else a CSS-wide keyword.
pub const PROPERTIES_AUTO_GLOBAL: Chain = Chain::new(&[
    ValueHandler::Properties,
    ValueHandler::Auto,
    ValueHandler::Global,
]);
