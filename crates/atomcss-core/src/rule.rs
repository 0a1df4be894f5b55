//! Rule entries: the unit of registration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A rule is either *static* (an exact token mapped to fixed declarations)
//! or *dynamic* (an anchored pattern plus a handler computing declarations
//! from the captured groups). Matching is two-staged for dynamic rules: the
//! pattern decides whether the token has the right shape, then the handler
//! decides whether the captured values mean anything.

use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::config::ResolveOptions;
use crate::declarations::Declarations;
use crate::error::{HandlerError, RuleError};
use crate::handlers::Chain;
use crate::theme::Theme;

/// What a handler returns: `Ok(Some(_))` claims the token, `Ok(None)`
/// declines it, `Err(_)` declines it with a reason worth logging.
pub type HandlerResult = Result<Option<Declarations>, HandlerError>;

/// A shared handler function.
pub type RuleHandler =
    Arc<dyn Fn(&CaptureGroups<'_>, &RuleContext<'_>) -> HandlerResult + Send + Sync>;

/// Ordered capture strings of a successful pattern match.
///
/// Index 0 is the whole token; 1..n mirror the pattern's capturing groups.
/// Optional groups that did not participate read as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGroups<'t> {
    groups: Vec<Option<&'t str>>,
}

impl<'t> CaptureGroups<'t> {
    pub fn new(groups: Vec<Option<&'t str>>) -> Self {
        Self { groups }
    }

    fn from_captures(captures: &Captures<'t>) -> Self {
        Self {
            groups: captures.iter().map(|m| m.map(|m| m.as_str())).collect(),
        }
    }

    /// The whole matched token.
    pub fn whole(&self) -> &'t str {
        self.get(0).unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<&'t str> {
        self.groups.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Read-only view handed to handlers for one token resolution.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub token: &'a str,
    pub theme: &'a Theme,
    pub options: &'a ResolveOptions,
}

impl<'a> RuleContext<'a> {
    pub fn new(token: &'a str, theme: &'a Theme, options: &'a ResolveOptions) -> Self {
        Self {
            token,
            theme,
            options,
        }
    }

    /// `theme[category][raw]` if present, else `chain` applied to `raw`.
    pub fn theme_or(&self, category: &str, raw: &str, chain: Chain) -> Option<String> {
        self.theme
            .lookup_css(category, raw)
            .map(|v| v.into_owned())
            .or_else(|| chain.apply_with(raw, self.options))
    }
}

/// Metadata attached to an entry and carried into its results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleMeta {
    /// Stylesheet layer the output belongs to; `None` means the default layer.
    pub layer: Option<String>,
    /// Ordering hint within a layer, lower first.
    pub sort: i32,
}

impl RuleMeta {
    pub fn layer(name: impl Into<String>) -> Self {
        Self {
            layer: Some(name.into()),
            sort: 0,
        }
    }

    pub fn with_sort(mut self, sort: i32) -> Self {
        self.sort = sort;
        self
    }
}

#[derive(Clone)]
pub enum RuleKind {
    Static {
        token: String,
        declarations: Declarations,
    },
    Dynamic {
        /// The pattern as written by the rule author.
        source: String,
        /// `source` anchored at both ends.
        matcher: Regex,
        handler: RuleHandler,
    },
}

/// A registered mapping from token shape to declaration-producing logic.
#[derive(Clone)]
pub struct RuleEntry {
    kind: RuleKind,
    meta: RuleMeta,
}

impl RuleEntry {
    /// A static entry matching `token` exactly.
    pub fn exact(
        token: impl Into<String>,
        declarations: impl Into<Declarations>,
    ) -> Result<Self, RuleError> {
        let token = token.into();
        if token.is_empty() {
            return Err(RuleError::EmptyToken);
        }
        Ok(Self {
            kind: RuleKind::Static {
                token,
                declarations: declarations.into(),
            },
            meta: RuleMeta::default(),
        })
    }

    /// A dynamic entry. The pattern is matched against the whole token, so
    /// `outline-(.+)` behaves as `^outline-(.+)$`.
    pub fn pattern<F>(pattern: &str, handler: F) -> Result<Self, RuleError>
    where
        F: Fn(&CaptureGroups<'_>, &RuleContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let matcher = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| {
            RuleError::MalformedPattern {
                pattern: pattern.to_string(),
                source: Box::new(source),
            }
        })?;
        Ok(Self {
            kind: RuleKind::Dynamic {
                source: pattern.to_string(),
                matcher,
                handler: Arc::new(handler),
            },
            meta: RuleMeta::default(),
        })
    }

    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn is_static(&self) -> bool {
        matches!(self.kind, RuleKind::Static { .. })
    }

    pub fn static_token(&self) -> Option<&str> {
        match &self.kind {
            RuleKind::Static { token, .. } => Some(token),
            RuleKind::Dynamic { .. } => None,
        }
    }

    /// The static token or the pattern source, for logs and listings.
    pub fn describe(&self) -> &str {
        match &self.kind {
            RuleKind::Static { token, .. } => token,
            RuleKind::Dynamic { source, .. } => source,
        }
    }

    /// Try this entry against a token.
    ///
    /// Returns `None` when the token does not have the entry's shape or the
    /// handler declined. Handler errors are logged and treated as declines.
    pub fn apply(&self, ctx: &RuleContext<'_>) -> Option<Declarations> {
        match &self.kind {
            RuleKind::Static {
                token,
                declarations,
            } => (token == ctx.token).then(|| declarations.clone()),
            RuleKind::Dynamic {
                source,
                matcher,
                handler,
            } => {
                let captures = matcher.captures(ctx.token)?;
                let groups = CaptureGroups::from_captures(&captures);
                match handler(&groups, ctx) {
                    Ok(declarations) => declarations,
                    Err(error) => {
                        tracing::debug!(
                            token = ctx.token,
                            rule = source.as_str(),
                            %error,
                            "Rule handler declined token"
                        );
                        None
                    }
                }
            }
        }
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("RuleEntry");
        match &self.kind {
            RuleKind::Static {
                token,
                declarations,
            } => s.field("token", token).field("declarations", declarations),
            RuleKind::Dynamic { source, .. } => s.field("pattern", source),
        };
        s.field("meta", &self.meta).finish()
    }
}
