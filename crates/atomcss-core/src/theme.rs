//! Theme values and nested key lookup.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A theme maps a category (`lineWidth`, `colors`, ...) to a map from key to
//! value. Values are strings, numbers, or nested maps (color scales such as
//! `colors.red.500`). Lookups never fail loudly: a missing category or key
//! is `None`, so rules can fall back to parsing the raw captured value.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HandlerError};
use crate::handlers::format_number;

/// A single theme value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    String(String),
    Number(f64),
    Map(IndexMap<String, ThemeValue>),
}

impl ThemeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ThemeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ThemeValue>> {
        match self {
            ThemeValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Render a scalar as a CSS value. Maps have no CSS form.
    pub fn as_css(&self) -> Option<Cow<'_, str>> {
        match self {
            ThemeValue::String(s) => Some(Cow::Borrowed(s)),
            ThemeValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            ThemeValue::Map(_) => None,
        }
    }

    /// Child value of a nested map.
    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    fn merge(&mut self, other: &ThemeValue) {
        match (self, other) {
            (ThemeValue::Map(target), ThemeValue::Map(source)) => {
                for (key, value) in source {
                    match target.get_mut(key) {
                        Some(existing) => existing.merge(value),
                        None => {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            (target, source) => *target = source.clone(),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(value: &str) -> Self {
        ThemeValue::String(value.to_string())
    }
}

impl From<String> for ThemeValue {
    fn from(value: String) -> Self {
        ThemeValue::String(value)
    }
}

impl From<f64> for ThemeValue {
    fn from(value: f64) -> Self {
        ThemeValue::Number(value)
    }
}

impl<K: Into<String>, V: Into<ThemeValue>> FromIterator<(K, V)> for ThemeValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ThemeValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The configuration object supplying named design values.
///
/// Built once per configuration and shared read-only by every resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(IndexMap<String, IndexMap<String, ThemeValue>>);

impl Theme {
    /// Create an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Theme::insert`] for a whole category.
    pub fn with_category<K, V>(
        mut self,
        category: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<ThemeValue>,
    {
        let map = self.0.entry(category.into()).or_default();
        for (key, value) in entries {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn insert(
        &mut self,
        category: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<ThemeValue>,
    ) {
        self.0
            .entry(category.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Single-level lookup: `theme[category][key]`.
    pub fn lookup(&self, category: &str, key: &str) -> Option<&ThemeValue> {
        self.0.get(category)?.get(key)
    }

    /// [`Theme::lookup`] rendered as a CSS value.
    pub fn lookup_css(&self, category: &str, key: &str) -> Option<Cow<'_, str>> {
        self.lookup(category, key)?.as_css()
    }

    /// Like [`Theme::lookup`] but reports the missing reference as a
    /// [`HandlerError`], for handlers that want to decline explicitly.
    pub fn require(&self, category: &str, key: &str) -> Result<&ThemeValue, HandlerError> {
        self.lookup(category, key)
            .ok_or_else(|| HandlerError::InvalidThemeReference {
                category: category.to_string(),
                key: key.to_string(),
            })
    }

    /// Walk an arbitrary key path, e.g. `["colors", "red", "500"]`.
    pub fn lookup_path(&self, path: &[&str]) -> Option<&ThemeValue> {
        let (category, rest) = path.split_first()?;
        let (key, rest) = rest.split_first()?;
        let mut value = self.lookup(category, key)?;
        for segment in rest {
            value = value.get(segment)?;
        }
        Some(value)
    }

    pub fn category(&self, name: &str) -> Option<&IndexMap<String, ThemeValue>> {
        self.0.get(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the shape of categories whose values rules read as scalars.
    ///
    /// `colors` values must be strings or scales of strings, and
    /// `lineWidth` values must be strings or numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(colors) = self.category("colors") {
            for (name, value) in colors {
                validate_color(&format!("colors.{}", name), value)?;
            }
        }
        if let Some(widths) = self.category("lineWidth") {
            for (name, value) in widths {
                if value.as_map().is_some() {
                    return Err(ConfigError::InvalidTheme {
                        message: format!("lineWidth.{} must be a string or number", name),
                    });
                }
            }
        }
        Ok(())
    }

    /// Deep-merge `other` into this theme. Nested maps are merged key by
    /// key; any other value in `other` replaces the existing one.
    pub fn merge(&mut self, other: &Theme) {
        for (category, entries) in &other.0 {
            let target = self.0.entry(category.clone()).or_default();
            for (key, value) in entries {
                match target.get_mut(key) {
                    Some(existing) => existing.merge(value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }
}

fn validate_color(path: &str, value: &ThemeValue) -> Result<(), ConfigError> {
    match value {
        ThemeValue::String(_) => Ok(()),
        ThemeValue::Map(scale) => scale
            .iter()
            .try_for_each(|(key, value)| validate_color(&format!("{}.{}", path, key), value)),
        ThemeValue::Number(_) => Err(ConfigError::InvalidTheme {
            message: format!("{} must be a color string, not a number", path),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_theme() -> Theme {
        Theme::new()
            .with_category("lineWidth", [("thin", "1px"), ("thick", "3px")])
            .with_category(
                "colors",
                [(
                    "red",
                    ThemeValue::from_iter([("DEFAULT", "#f87171"), ("500", "#ef4444")]),
                )],
            )
    }

    #[test]
    fn test_lookup_existing_key() {
        let theme = sample_theme();
        assert_eq!(
            theme.lookup("lineWidth", "thin"),
            Some(&ThemeValue::from("1px"))
        );
    }

    #[test]
    fn test_lookup_missing_category_or_key() {
        let theme = sample_theme();
        assert!(theme.lookup("spacing", "4").is_none());
        assert!(theme.lookup("lineWidth", "4").is_none());
    }

    #[test]
    fn test_lookup_is_exact() {
        let theme = sample_theme();
        assert!(theme.lookup("lineWidth", "thi").is_none());
        assert!(theme.lookup("lineWidth", "THIN").is_none());
    }

    #[test]
    fn test_lookup_path_nested() {
        let theme = sample_theme();
        let value = theme.lookup_path(&["colors", "red", "500"]).unwrap();
        assert_eq!(value.as_str(), Some("#ef4444"));
        assert!(theme.lookup_path(&["colors", "red", "900"]).is_none());
        assert!(theme.lookup_path(&["colors"]).is_none());
        assert!(theme.lookup_path(&[]).is_none());
    }

    #[test]
    fn test_number_renders_trimmed() {
        let value = ThemeValue::Number(1.50);
        assert_eq!(value.as_css().unwrap(), "1.5");
        assert!(ThemeValue::from_iter([("a", "b")]).as_css().is_none());
    }

    #[test]
    fn test_require_reports_reference() {
        let theme = sample_theme();
        let err = theme.require("lineWidth", "huge").unwrap_err();
        assert_eq!(
            err,
            HandlerError::InvalidThemeReference {
                category: "lineWidth".to_string(),
                key: "huge".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_is_deep() {
        let mut theme = sample_theme();
        let overrides = Theme::new()
            .with_category("lineWidth", [("thick", "4px")])
            .with_category(
                "colors",
                [("red", ThemeValue::from_iter([("500", "#dc2626")]))],
            );
        theme.merge(&overrides);

        assert_eq!(theme.lookup_css("lineWidth", "thick").unwrap(), "4px");
        assert_eq!(theme.lookup_css("lineWidth", "thin").unwrap(), "1px");
        assert_eq!(
            theme.lookup_path(&["colors", "red", "500"]).unwrap().as_str(),
            Some("#dc2626")
        );
        assert_eq!(
            theme
                .lookup_path(&["colors", "red", "DEFAULT"])
                .unwrap()
                .as_str(),
            Some("#f87171")
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let theme: Theme = serde_json::from_str(
            r##"{"lineWidth": {"thin": "1px", "hair": 0.5}, "colors": {"brand": {"DEFAULT": "#123456"}}}"##,
        )
        .unwrap();
        assert_eq!(theme.lookup_css("lineWidth", "hair").unwrap(), "0.5");
        assert_eq!(
            theme
                .lookup_path(&["colors", "brand", "DEFAULT"])
                .and_then(ThemeValue::as_str),
            Some("#123456")
        );
        let categories: Vec<_> = theme.categories().collect();
        assert_eq!(categories, vec!["lineWidth", "colors"]);
    }

    #[test]
    fn test_validate_accepts_well_formed_theme() {
        assert!(sample_theme().validate().is_ok());
        assert!(Theme::new().validate().is_ok());
        let theme = Theme::new().with_category("lineWidth", [("hair", 0.5)]);
        assert!(theme.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_numeric_color() {
        let theme: Theme = serde_json::from_str(r#"{"colors": {"red": {"500": 500}}}"#).unwrap();
        let err = theme.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTheme { .. }));
        assert_eq!(
            err.to_string(),
            "invalid theme: colors.red.500 must be a color string, not a number"
        );
    }

    #[test]
    fn test_validate_rejects_nested_line_width() {
        let theme: Theme =
            serde_json::from_str(r#"{"lineWidth": {"thin": {"DEFAULT": "1px"}}}"#).unwrap();
        assert_eq!(
            theme.validate().unwrap_err().to_string(),
            "invalid theme: lineWidth.thin must be a string or number"
        );
    }
}
