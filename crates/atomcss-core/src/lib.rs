//! Utility token resolution engine
//!
//! This crate turns atomic utility tokens such as `outline-offset-4` or
//! `outline-red/50` into ordered CSS declarations, driven by an ordered list
//! of rules and a theme.
//!
//! # Architecture
//!
//! - [`RuleEntry`] - a static token or an anchored pattern plus handler
//! - [`Registry`] - ordered entries; order is precedence
//! - [`Theme`] - nested design tokens (`lineWidth`, `colors`, ...)
//! - [`handlers`] - value combinators (`bracket`, `px`, `percent`, ...)
//! - [`color`] - color resolution with opacity modifiers
//! - [`Resolver`] - first-match resolution with a per-resolver cache
//!
//! # Example
//!
//! ```
//! use atomcss_core::{Declarations, Resolver, ResolverConfig, RuleEntry};
//! use atomcss_core::handlers::BRACKET_CSSVAR_PX;
//!
//! let offset = RuleEntry::pattern(r"outline-offset-(.+)", |groups, ctx| {
//!     Ok(groups
//!         .get(1)
//!         .and_then(|d| ctx.theme_or("lineWidth", d, BRACKET_CSSVAR_PX))
//!         .map(|v| Declarations::new().with("outline-offset", v)))
//! })
//! .unwrap();
//!
//! let resolver = Resolver::new(ResolverConfig::new().with_rules([offset]));
//! let utility = resolver.resolve("outline-offset-4").unwrap();
//! assert_eq!(utility.declarations.get("outline-offset"), Some("4px"));
//! ```

pub mod color;
pub mod config;
pub mod css;
pub mod declarations;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod theme;

// Re-export commonly used types
pub use color::color_resolver;
pub use config::{Preset, ResolveOptions, ResolverConfig};
pub use css::{escape_selector, to_css};
pub use declarations::Declarations;
pub use error::{ConfigError, HandlerError, Result, RuleError};
pub use handlers::{Chain, ValueHandler};
pub use registry::Registry;
pub use resolver::{ResolvedUtility, Resolver};
pub use rule::{CaptureGroups, HandlerResult, RuleContext, RuleEntry, RuleHandler, RuleKind, RuleMeta};
pub use theme::{Theme, ThemeValue};
