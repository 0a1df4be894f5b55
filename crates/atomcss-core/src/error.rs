//! Error types for rule construction, handler evaluation and configuration.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors raised while building rule entries.
///
/// These indicate a broken rule set rather than a bad input token, so they
/// are reported once at configuration time.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The pattern of a dynamic rule does not compile.
    #[error("malformed rule pattern `{pattern}`: {source}")]
    MalformedPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A static rule was registered with an empty token.
    #[error("static rule token must not be empty")]
    EmptyToken,
}

/// Recoverable failures a handler may report after its pattern matched.
///
/// The resolver never propagates these: the entry is treated as if it had
/// declined and the walk continues with the next entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler needed a theme value that does not exist.
    #[error("theme has no value at {category}.{key}")]
    InvalidThemeReference { category: String, key: String },

    /// The captured value could not be interpreted.
    #[error("cannot interpret `{value}`: {reason}")]
    InvalidValue { value: String, reason: String },
}

impl HandlerError {
    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while assembling a resolver configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// A preset was requested by a name nobody provides.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A theme document has an unexpected shape.
    #[error("invalid theme: {message}")]
    InvalidTheme { message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
