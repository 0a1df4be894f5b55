//! Theme-aware color resolution with opacity modifiers.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A color rule captures a color value such as `red`, `red-500`, `red/50`,
//! `[#0f0]`, `#0f0`, `hex-0f0` or `$brand`. The value is split into a color
//! part and an optional alpha part, the color part is resolved (literal,
//! theme color, or CSS color keyword), and the alpha is composed into the
//! color value in a form that is valid for the kind of color it is.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::declarations::Declarations;
use crate::error::HandlerError;
use crate::handlers::{bracket, cssvar, format_number, percent};
use crate::rule::{CaptureGroups, HandlerResult, RuleContext};
use crate::theme::{Theme, ThemeValue};

/// `red500` → `red-500`.
static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([0-9])").unwrap());

/// `rgb(...)`, `rgba(...)`, `hsl(...)`, `hsla(...)`. Group 1 is the
/// function name, group 2 its arguments.
static COLOR_FUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(rgba?|hsla?)\((.+)\)$").unwrap());

static BARE_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^var\(--[\w-]+\)$").unwrap());

// Sorted for binary_search
const CSS_COLOR_KEYWORDS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "currentcolor", "cyan",
    "darkblue", "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

pub fn is_color_keyword(name: &str) -> bool {
    CSS_COLOR_KEYWORDS
        .binary_search(&name.to_ascii_lowercase().as_str())
        .is_ok()
}

/// A parsed color value.
#[derive(Debug, Clone, PartialEq)]
pub enum CssColor {
    /// A hex or numeric `rgb()` color.
    Rgb { rgb: [u8; 3], alpha: Option<f64> },
    /// A color function whose channels are opaque text, e.g.
    /// `rgb(var(--brand))` or `hsl(210 40% 50%)`.
    Channels { function: String, channels: String },
    /// A bare variable reference, `var(--brand)`.
    Variable(String),
    /// A value carrying an alpha placeholder (`%alpha` or `<alpha-value>`).
    Template(String),
    /// Anything else: keywords and literal values, passed through.
    Literal(String),
}

impl CssColor {
    /// Render this color under `property`, composing `alpha` when given.
    ///
    /// Without an alpha, colors that can take one reference the companion
    /// custom property `--un-<var_name>-opacity`, emitted after the color.
    pub fn declarations(&self, property: &str, var_name: &str, alpha: Option<&str>) -> Declarations {
        let opacity_var = format!("--un-{}-opacity", var_name);
        let companion = |value: String| {
            Declarations::new()
                .with(property, value)
                .with(opacity_var.as_str(), "1")
        };

        match (self, alpha) {
            (CssColor::Rgb { rgb: [r, g, b], .. }, Some(a)) => {
                Declarations::new().with(property, format!("rgba({},{},{},{})", r, g, b, a))
            }
            (
                CssColor::Rgb {
                    rgb: [r, g, b],
                    alpha: Some(own),
                },
                None,
            ) => Declarations::new().with(
                property,
                format!("rgba({},{},{},{})", r, g, b, format_number(*own)),
            ),
            (
                CssColor::Rgb {
                    rgb: [r, g, b],
                    alpha: None,
                },
                None,
            ) => companion(format!("rgba({},{},{},var({}))", r, g, b, opacity_var)),
            (CssColor::Channels { function, channels }, Some(a)) => {
                Declarations::new().with(property, format!("{}({} / {})", function, channels, a))
            }
            (CssColor::Channels { function, channels }, None) => companion(format!(
                "{}({} / var({}))",
                function, channels, opacity_var
            )),
            (CssColor::Variable(var), Some(a)) => {
                Declarations::new().with(property, format!("rgb({} / {})", var, a))
            }
            (CssColor::Variable(var), None) => Declarations::new().with(property, var.as_str()),
            (CssColor::Template(template), Some(a)) => {
                Declarations::new().with(property, fill_alpha(template, a))
            }
            (CssColor::Template(template), None) => {
                companion(fill_alpha(template, &format!("var({})", opacity_var)))
            }
            (CssColor::Literal(value), Some(a)) => Declarations::new().with(
                property,
                format!("color-mix(in srgb, {} {}, transparent)", value, alpha_percent(a)),
            ),
            (CssColor::Literal(value), None) => Declarations::new().with(property, value.as_str()),
        }
    }
}

fn fill_alpha(template: &str, alpha: &str) -> String {
    template
        .replace("%alpha", alpha)
        .replace("<alpha-value>", alpha)
}

fn alpha_percent(alpha: &str) -> String {
    if alpha.ends_with('%') {
        return alpha.to_string();
    }
    match alpha.parse::<f64>() {
        Ok(n) => format!("{}%", format_number(n * 100.0)),
        Err(_) => format!("calc({} * 100%)", alpha),
    }
}

/// Parse 3, 4, 6 or 8 hex digits (without the `#`).
pub fn parse_hex(hex: &str) -> Option<CssColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let rgb = [byte(0)?, byte(2)?, byte(4)?];
    let alpha = if expanded.len() == 8 {
        Some(f64::from(byte(6)?) / 255.0)
    } else {
        None
    };
    Some(CssColor::Rgb { rgb, alpha })
}

/// Parse a color value as found in a theme or a bracket literal.
pub fn parse_color(value: &str) -> Option<CssColor> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains("%alpha") || value.contains("<alpha-value>") {
        return Some(CssColor::Template(value.to_string()));
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if BARE_VAR.is_match(value) {
        return Some(CssColor::Variable(value.to_string()));
    }
    if let Some(captures) = COLOR_FUNCTION.captures(value) {
        let function = captures[1].to_ascii_lowercase();
        let arguments = captures[2].trim();
        if arguments.contains('/') {
            return Some(CssColor::Literal(value.to_string()));
        }
        if arguments.contains(',') {
            return Some(parse_rgb_arguments(&function, arguments).unwrap_or_else(|| {
                CssColor::Literal(value.to_string())
            }));
        }
        return Some(CssColor::Channels {
            function: function.trim_end_matches('a').to_string(),
            channels: arguments.to_string(),
        });
    }
    Some(CssColor::Literal(value.to_string()))
}

/// `rgb(1, 2, 3)` / `rgba(1, 2, 3, 0.5)` with plain numbers.
fn parse_rgb_arguments(function: &str, arguments: &str) -> Option<CssColor> {
    if !function.starts_with("rgb") {
        return None;
    }
    let parts: Vec<&str> = arguments.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(CssColor::Rgb {
            rgb: [channel(r)?, channel(g)?, channel(b)?],
            alpha: None,
        }),
        [r, g, b, a] => Some(CssColor::Rgb {
            rgb: [channel(r)?, channel(g)?, channel(b)?],
            alpha: Some(a.parse::<f64>().ok()?),
        }),
        _ => None,
    }
}

/// Split `color/alpha`. A bracketed color may itself contain `/`.
fn split_opacity(body: &str) -> Option<(&str, Option<&str>)> {
    let (main, opacity) = if body.starts_with('[') {
        let end = body.find(']')?;
        let (main, rest) = body.split_at(end + 1);
        if rest.is_empty() {
            (main, None)
        } else {
            (main, Some(rest.strip_prefix('/')?))
        }
    } else {
        match body.split_once('/') {
            Some((main, opacity)) => (main, Some(opacity)),
            None => (body, None),
        }
    };
    if main.is_empty() || opacity.is_some_and(str::is_empty) {
        return None;
    }
    Some((main, opacity))
}

/// Look up a color name in `theme.colors`.
///
/// `red-500` and `red500` walk into the `red` scale; a bare scale name
/// resolves to its `DEFAULT` entry; multi-word names may be written as
/// `light-blue` or stored as `lightBlue`.
pub fn theme_color<'t>(theme: &'t Theme, name: &str) -> Option<&'t str> {
    let normalized = LETTER_DIGIT.replace_all(name, "${1}-${2}");
    let segments: Vec<&str> = normalized.split('-').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    lookup_color(theme.category("colors")?, &segments)
}

/// Try the longest run of segments first at each level, so `light-blue`
/// finds `lightBlue` before `light` is considered a scale of its own.
fn lookup_color<'t>(level: &'t IndexMap<String, ThemeValue>, segments: &[&str]) -> Option<&'t str> {
    for split in (1..=segments.len()).rev() {
        let (head, tail) = segments.split_at(split);
        let Some(value) = level
            .get(&head.join("-"))
            .or_else(|| level.get(&camel_case(head)))
        else {
            continue;
        };
        let found = if tail.is_empty() {
            color_leaf(value)
        } else {
            value.as_map().and_then(|map| lookup_color(map, tail))
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn camel_case(segments: &[&str]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn color_leaf(value: &ThemeValue) -> Option<&str> {
    match value {
        ThemeValue::String(s) => Some(s),
        ThemeValue::Map(m) => m.get("DEFAULT")?.as_str(),
        ThemeValue::Number(_) => None,
    }
}

fn resolve_color_part(main: &str, ctx: &RuleContext<'_>) -> Option<CssColor> {
    if ctx.options.bracket
        && let Some(inner) = bracket(main)
    {
        return parse_color(&inner);
    }
    if let Some(hex) = main.strip_prefix('#').or_else(|| main.strip_prefix("hex-")) {
        return parse_hex(hex);
    }
    if ctx.options.cssvar
        && let Some(var) = cssvar(main)
    {
        return Some(CssColor::Variable(var));
    }
    if let Some(value) = theme_color(ctx.theme, main) {
        return parse_color(value);
    }
    is_color_keyword(main).then(|| CssColor::Literal(main.to_string()))
}

/// An alpha outside `0..=1` is reported rather than emitted.
fn resolve_alpha(opacity: &str, ctx: &RuleContext<'_>) -> Result<Option<String>, HandlerError> {
    let alpha = if ctx.options.bracket
        && let Some(inner) = bracket(opacity)
    {
        inner
    } else {
        match percent(opacity) {
            Some(alpha) => alpha,
            None => return Ok(None),
        }
    };
    if alpha
        .parse::<f64>()
        .is_ok_and(|n| !(0.0..=1.0).contains(&n))
    {
        return Err(HandlerError::invalid_value(opacity, "opacity must be between 0 and 100"));
    }
    Ok(Some(alpha))
}

/// Resolve a color value to a color and an optional composed alpha.
///
/// Returns `Ok(None)` when the value is not a color and an error when the
/// color is recognized but its alpha is out of range.
pub fn resolve_color(
    body: &str,
    ctx: &RuleContext<'_>,
) -> Result<Option<(CssColor, Option<String>)>, HandlerError> {
    let Some((main, opacity)) = split_opacity(body) else {
        return Ok(None);
    };
    let Some(color) = resolve_color_part(main, ctx) else {
        return Ok(None);
    };
    let alpha = match opacity {
        Some(opacity) => match resolve_alpha(opacity, ctx)? {
            Some(alpha) => Some(alpha),
            None => return Ok(None),
        },
        None => None,
    };
    Ok(Some((color, alpha)))
}

/// Build a handler for color rules.
///
/// The handler reads the color value from capture group 1 and emits the
/// color under `property`. `var_name` names the companion opacity custom
/// property (`--un-<var_name>-opacity`). Unrecognized colors decline.
pub fn color_resolver(
    property: &str,
    var_name: &str,
) -> impl Fn(&CaptureGroups<'_>, &RuleContext<'_>) -> HandlerResult + Send + Sync + Clone + use<> {
    let property = property.to_string();
    let var_name = var_name.to_string();
    move |groups, ctx| {
        let Some(body) = groups.get(1) else {
            return Ok(None);
        };
        Ok(resolve_color(body, ctx)?
            .map(|(color, alpha)| color.declarations(&property, &var_name, alpha.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveOptions;

    fn theme() -> Theme {
        Theme::new().with_category(
            "colors",
            [
                ("transparent", ThemeValue::from("transparent")),
                ("current", ThemeValue::from("currentColor")),
                (
                    "red",
                    ThemeValue::from_iter([
                        ("DEFAULT", "#f87171"),
                        ("100", "#fee2e2"),
                        ("500", "#ef4444"),
                    ]),
                ),
                ("lightBlue", ThemeValue::from_iter([("500", "#0ea5e9")])),
                ("brand", ThemeValue::from("rgb(var(--brand))")),
                ("accent", ThemeValue::from("var(--accent)")),
                ("ink", ThemeValue::from("rgba(var(--ink), %alpha)")),
            ],
        )
    }

    fn handle(body: &str) -> HandlerResult {
        let theme = theme();
        let options = ResolveOptions::default();
        let ctx = RuleContext::new("outline-color", &theme, &options);
        let groups = CaptureGroups::new(vec![Some("outline-color"), Some(body)]);
        color_resolver("outline-color", "outline-color")(&groups, &ctx)
    }

    fn resolve(body: &str) -> Option<Declarations> {
        handle(body).unwrap()
    }

    #[test]
    fn test_color_keywords_sorted() {
        assert!(CSS_COLOR_KEYWORDS.windows(2).all(|w| w[0] < w[1]));
        assert!(is_color_keyword("rebeccapurple"));
        assert!(is_color_keyword("currentColor"));
        assert!(!is_color_keyword("offset"));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            parse_hex("f00"),
            Some(CssColor::Rgb {
                rgb: [255, 0, 0],
                alpha: None
            })
        );
        assert_eq!(
            parse_hex("00ff0080"),
            Some(CssColor::Rgb {
                rgb: [0, 255, 0],
                alpha: Some(128.0 / 255.0)
            })
        );
        assert_eq!(parse_hex("ff"), None);
        assert_eq!(parse_hex("ggg"), None);
    }

    #[test]
    fn test_parse_color_kinds() {
        assert_eq!(
            parse_color("rgb(var(--brand))"),
            Some(CssColor::Channels {
                function: "rgb".to_string(),
                channels: "var(--brand)".to_string()
            })
        );
        assert_eq!(
            parse_color("rgb(10, 20, 30)"),
            Some(CssColor::Rgb {
                rgb: [10, 20, 30],
                alpha: None
            })
        );
        assert_eq!(
            parse_color("var(--accent)"),
            Some(CssColor::Variable("var(--accent)".to_string()))
        );
        assert_eq!(
            parse_color("rgb(0 0 0 / 50%)"),
            Some(CssColor::Literal("rgb(0 0 0 / 50%)".to_string()))
        );
        assert_eq!(parse_color("  "), None);
    }

    #[test]
    fn test_theme_color_lookup() {
        let theme = theme();
        assert_eq!(theme_color(&theme, "red"), Some("#f87171"));
        assert_eq!(theme_color(&theme, "red-500"), Some("#ef4444"));
        assert_eq!(theme_color(&theme, "red500"), Some("#ef4444"));
        assert_eq!(theme_color(&theme, "light-blue-500"), Some("#0ea5e9"));
        assert_eq!(theme_color(&theme, "red-900"), None);
        assert_eq!(theme_color(&theme, "offset-4"), None);
        assert_eq!(theme_color(&theme, ""), None);
    }

    #[test]
    fn test_theme_hex_without_alpha_uses_companion() {
        let decls = resolve("red").unwrap();
        assert_eq!(
            decls.to_string(),
            "outline-color:rgba(248,113,113,var(--un-outline-color-opacity));--un-outline-color-opacity:1;"
        );
    }

    #[test]
    fn test_theme_hex_with_alpha() {
        let decls = resolve("red/50").unwrap();
        assert_eq!(decls.to_string(), "outline-color:rgba(248,113,113,0.5);");
        assert_ne!(decls, resolve("red").unwrap());
    }

    #[test]
    fn test_alpha_out_of_range_is_rejected() {
        assert_eq!(
            handle("red/150"),
            Err(HandlerError::invalid_value(
                "150",
                "opacity must be between 0 and 100"
            ))
        );
        assert!(matches!(
            handle("red-500/[1.5]"),
            Err(HandlerError::InvalidValue { .. })
        ));
        assert!(matches!(handle("red/-5"), Err(HandlerError::InvalidValue { .. })));
        assert_eq!(
            resolve("red/100").unwrap().get("outline-color"),
            Some("rgba(248,113,113,1)")
        );
        assert_eq!(
            resolve("red/0").unwrap().get("outline-color"),
            Some("rgba(248,113,113,0)")
        );
        // Not a color, so the alpha is never looked at.
        assert_eq!(handle("offset/150"), Ok(None));
    }

    #[test]
    fn test_bracket_alpha() {
        let decls = resolve("red-500/[0.35]").unwrap();
        assert_eq!(decls.get("outline-color"), Some("rgba(239,68,68,0.35)"));
    }

    #[test]
    fn test_variable_theme_colors_compose_alpha() {
        assert_eq!(
            resolve("brand/25").unwrap().get("outline-color"),
            Some("rgb(var(--brand) / 0.25)")
        );
        assert_eq!(
            resolve("brand").unwrap().to_string(),
            "outline-color:rgb(var(--brand) / var(--un-outline-color-opacity));--un-outline-color-opacity:1;"
        );
        assert_eq!(
            resolve("accent/50").unwrap().get("outline-color"),
            Some("rgb(var(--accent) / 0.5)")
        );
        assert_eq!(
            resolve("accent").unwrap().to_string(),
            "outline-color:var(--accent);"
        );
        assert_eq!(
            resolve("ink/10").unwrap().get("outline-color"),
            Some("rgba(var(--ink), 0.1)")
        );
    }

    #[test]
    fn test_literals_and_keywords() {
        assert_eq!(
            resolve("[#00ff00]").unwrap().get("outline-color"),
            Some("rgba(0,255,0,var(--un-outline-color-opacity))")
        );
        assert_eq!(
            resolve("#0f0/50").unwrap().get("outline-color"),
            Some("rgba(0,255,0,0.5)")
        );
        assert_eq!(
            resolve("hex-0f0").unwrap().get("outline-color"),
            Some("rgba(0,255,0,var(--un-outline-color-opacity))")
        );
        assert_eq!(
            resolve("rebeccapurple").unwrap().to_string(),
            "outline-color:rebeccapurple;"
        );
        assert_eq!(
            resolve("rebeccapurple/40").unwrap().get("outline-color"),
            Some("color-mix(in srgb, rebeccapurple 40%, transparent)")
        );
        assert_eq!(
            resolve("current").unwrap().to_string(),
            "outline-color:currentColor;"
        );
        assert_eq!(
            resolve("$focus").unwrap().to_string(),
            "outline-color:var(--focus);"
        );
    }

    #[test]
    fn test_bracket_color_with_slash_inside() {
        assert_eq!(
            resolve("[rgb(0_0_0/50%)]").unwrap().get("outline-color"),
            Some("rgb(0_0_0/50%)")
        );
    }

    #[test]
    fn test_unrecognized_color_declines() {
        assert!(resolve("offset-4").is_none());
        assert!(resolve("dashed").is_none());
        assert!(resolve("red/").is_none());
        assert!(resolve("red/abc").is_none());
        assert!(resolve("#12345").is_none());
    }
}
