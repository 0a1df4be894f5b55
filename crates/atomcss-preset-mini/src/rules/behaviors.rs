/*
 * behaviors.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Outline, appearance and will-change rules.
 */

//! Behavior rules.
//!
//! Entry order matters: `outline-offset-4` first reaches the width rule
//! (whose chain rejects `offset-4`), then the color rule (`offset-4` is not
//! a color), and only then the offset rule.

use atomcss_core::handlers::{BRACKET_CSSVAR_PX, PROPERTIES_AUTO_GLOBAL};
use atomcss_core::{
    CaptureGroups, Declarations, HandlerResult, RuleContext, RuleEntry, RuleError, color_resolver,
};

const OUTLINE_STYLES: &str =
    "auto|dashed|dotted|double|hidden|solid|groove|ridge|inset|outset|inherit|initial|revert|unset";

/// `theme.lineWidth[d]`, else bracket / css variable / px.
fn line_width(
    property: &'static str,
) -> impl Fn(&CaptureGroups<'_>, &RuleContext<'_>) -> HandlerResult + Send + Sync + 'static {
    move |groups, ctx| {
        Ok(groups
            .get(1)
            .and_then(|d| ctx.theme_or("lineWidth", d, BRACKET_CSSVAR_PX))
            .map(|value| Declarations::new().with(property, value)))
    }
}

pub fn outline() -> Result<Vec<RuleEntry>, RuleError> {
    Ok(vec![
        RuleEntry::pattern(r"outline-(?:width-|size-)?(.+)", line_width("outline-width"))?,
        RuleEntry::pattern(
            r"outline-(?:color-)?(.+)",
            color_resolver("outline-color", "outline-color"),
        )?,
        RuleEntry::pattern(r"outline-offset-(.+)", line_width("outline-offset"))?,
        RuleEntry::exact("outline", [("outline-style", "solid")])?,
        RuleEntry::pattern(&format!("outline-({})", OUTLINE_STYLES), |groups, _| {
            Ok(groups
                .get(1)
                .map(|style| Declarations::new().with("outline-style", style)))
        })?,
        RuleEntry::exact(
            "outline-none",
            [("outline", "2px solid transparent"), ("outline-offset", "2px")],
        )?,
    ])
}

pub fn appearance() -> Result<Vec<RuleEntry>, RuleError> {
    Ok(vec![RuleEntry::exact(
        "appearance-none",
        [("appearance", "none"), ("-webkit-appearance", "none")],
    )?])
}

fn will_change_value(raw: &str) -> Option<String> {
    PROPERTIES_AUTO_GLOBAL.apply(raw).or_else(|| {
        let value = match raw {
            "contents" => "contents",
            "scroll" => "scroll-position",
            _ => return None,
        };
        Some(value.to_string())
    })
}

pub fn will_change() -> Result<Vec<RuleEntry>, RuleError> {
    Ok(vec![RuleEntry::pattern(r"will-change-(.+)", |groups, _| {
        Ok(groups
            .get(1)
            .and_then(will_change_value)
            .map(|value| Declarations::new().with("will-change", value)))
    })?])
}
