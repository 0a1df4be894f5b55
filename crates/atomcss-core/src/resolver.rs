//! Token resolution against an ordered registry.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A [`Resolver`] owns one registry, one merged theme and one set of
//! options. Resolution is a pure function of those three and the token, so
//! results are memoized per token. The memo table belongs to the resolver:
//! reconfiguring or clearing it drops every cached answer.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::config::{ResolveOptions, ResolverConfig};
use crate::declarations::Declarations;
use crate::registry::Registry;
use crate::rule::{RuleContext, RuleMeta};
use crate::theme::Theme;

/// The outcome of resolving one token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedUtility {
    pub token: String,
    pub declarations: Declarations,
    /// Registry index of the winning entry.
    pub entry: usize,
    pub meta: RuleMeta,
}

type Cache = HashMap<String, Option<Arc<ResolvedUtility>>>;

/// Resolves utility tokens to declarations.
#[derive(Debug)]
pub struct Resolver {
    registry: Registry,
    theme: Arc<Theme>,
    options: ResolveOptions,
    cache: RwLock<Cache>,
}

impl Resolver {
    /// Build a resolver from a configuration.
    pub fn new(config: ResolverConfig) -> Self {
        let (registry, theme) = (config.build_registry(), config.build_theme());
        tracing::debug!(
            entries = registry.len(),
            presets = config.presets.len(),
            "Built resolver"
        );
        Self::from_parts(registry, theme, config.options)
    }

    /// Build a resolver from an already assembled registry and theme.
    pub fn from_parts(registry: Registry, theme: Theme, options: ResolveOptions) -> Self {
        Self {
            registry,
            theme: Arc::new(theme),
            options,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve a token to the declarations of the first entry that claims it.
    ///
    /// `None` means no entry matched. Both outcomes are cached.
    pub fn resolve(&self, token: &str) -> Option<Arc<ResolvedUtility>> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
        {
            tracing::trace!(token, "Cache hit");
            return cached.clone();
        }

        tracing::trace!(token, "Cache miss");
        let resolved = self.resolve_uncached(token).map(Arc::new);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), resolved.clone());
        resolved
    }

    /// Resolve without consulting or filling the cache.
    pub fn resolve_uncached(&self, token: &str) -> Option<ResolvedUtility> {
        if token.is_empty() {
            return None;
        }
        let ctx = RuleContext::new(token, &self.theme, &self.options);
        let (entry, declarations) = self.registry.first_match(&ctx)?;
        Some(self.utility(token, entry, declarations))
    }

    /// Every entry that yields declarations for the token, in registry
    /// order. Not cached.
    pub fn resolve_all(&self, token: &str) -> Vec<ResolvedUtility> {
        if token.is_empty() {
            return Vec::new();
        }
        let ctx = RuleContext::new(token, &self.theme, &self.options);
        self.registry
            .all_matches(&ctx)
            .into_iter()
            .map(|(entry, declarations)| self.utility(token, entry, declarations))
            .collect()
    }

    /// Resolve a batch. Output follows input order, repeated tokens appear
    /// once and unmatched tokens are skipped.
    pub fn resolve_many<'a>(
        &self,
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Arc<ResolvedUtility>> {
        let mut seen = HashSet::new();
        tokens
            .into_iter()
            .filter(|token| seen.insert(*token))
            .filter_map(|token| self.resolve(token))
            .collect()
    }

    /// Replace registry, theme and options, dropping every cached result.
    pub fn reconfigure(&mut self, config: ResolverConfig) {
        self.registry = config.build_registry();
        self.theme = Arc::new(config.build_theme());
        self.options = config.options;
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::debug!(
            entries = self.registry.len(),
            presets = config.presets.len(),
            "Reconfigured resolver"
        );
    }

    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached tokens, matched or not.
    pub fn cache_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn utility(&self, token: &str, entry: usize, declarations: Declarations) -> ResolvedUtility {
        let meta = self
            .registry
            .get(entry)
            .map(|e| e.meta().clone())
            .unwrap_or_default();
        ResolvedUtility {
            token: token.to_string(),
            declarations,
            entry,
            meta,
        }
    }
}

impl From<ResolverConfig> for Resolver {
    fn from(config: ResolverConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::handlers::BRACKET_CSSVAR_PX;
    use crate::rule::RuleEntry;

    fn width_rule() -> RuleEntry {
        RuleEntry::pattern(r"border-(.+)", |groups, ctx| {
            Ok(groups
                .get(1)
                .and_then(|d| ctx.theme_or("lineWidth", d, BRACKET_CSSVAR_PX))
                .map(|v| Declarations::new().with("border-width", v)))
        })
        .unwrap()
    }

    fn resolver() -> Resolver {
        Resolver::new(
            ResolverConfig::new().with_preset(
                Preset::new("test")
                    .with_rules([width_rule()])
                    .with_theme(Theme::new().with_category("lineWidth", [("thin", "1px")])),
            ),
        )
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
        assert_send_sync::<Arc<ResolvedUtility>>();
    }

    #[test]
    fn test_resolve_uses_theme_then_chain() {
        let resolver = resolver();
        let thin = resolver.resolve("border-thin").unwrap();
        assert_eq!(thin.declarations.get("border-width"), Some("1px"));
        assert_eq!(thin.entry, 0);

        let four = resolver.resolve("border-4").unwrap();
        assert_eq!(four.declarations.get("border-width"), Some("4px"));

        assert!(resolver.resolve("border-wide").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_cache_holds_matches_and_misses() {
        let resolver = resolver();
        assert_eq!(resolver.cache_len(), 0);

        let first = resolver.resolve("border-2").unwrap();
        let second = resolver.resolve("border-2").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(resolver.resolve("nope").is_none());
        assert_eq!(resolver.cache_len(), 2);

        resolver.clear_cache();
        assert_eq!(resolver.cache_len(), 0);
    }

    #[test]
    fn test_reconfigure_drops_cache() {
        let mut resolver = resolver();
        assert!(resolver.resolve("border-thin").is_some());

        resolver.reconfigure(ResolverConfig::new().with_rules([RuleEntry::exact(
            "border-thin",
            [("border-width", "0.5px")],
        )
        .unwrap()]));

        assert_eq!(resolver.cache_len(), 0);
        let thin = resolver.resolve("border-thin").unwrap();
        assert_eq!(thin.declarations.get("border-width"), Some("0.5px"));
        assert!(resolver.resolve("border-4").is_none());
    }

    #[test]
    fn test_resolve_all_collects_every_match() {
        let resolver = Resolver::new(
            ResolverConfig::new()
                .with_rules([RuleEntry::exact("border-4", [("border-width", "1rem")]).unwrap()])
                .with_preset(Preset::new("test").with_rules([width_rule()])),
        );
        let all = resolver.resolve_all("border-4");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].declarations.get("border-width"), Some("1rem"));
        assert_eq!(all[1].declarations.get("border-width"), Some("4px"));
        assert_eq!(resolver.cache_len(), 0);
    }

    #[test]
    fn test_resolve_many_dedupes_and_skips() {
        let resolver = resolver();
        let resolved = resolver.resolve_many(["border-2", "nope", "border-thin", "border-2"]);
        let tokens: Vec<_> = resolved.iter().map(|u| u.token.as_str()).collect();
        assert_eq!(tokens, vec!["border-2", "border-thin"]);
    }

    #[test]
    fn test_empty_declarations_is_a_match() {
        let resolver = Resolver::new(
            ResolverConfig::new()
                .with_rules([RuleEntry::pattern(r"noop-(.+)", |_, _| Ok(Some(Declarations::new())))
                    .unwrap()])
                .with_preset(Preset::new("test").with_rules([RuleEntry::pattern(
                    r"noop-(.+)",
                    |_, _| Ok(Some(Declarations::from([("never", "1")]))),
                )
                .unwrap()])),
        );
        let hit = resolver.resolve("noop-x").unwrap();
        assert!(hit.declarations.is_empty());
        assert_eq!(hit.entry, 0);
    }

    #[test]
    fn test_concurrent_resolution_agrees() {
        let resolver = Arc::new(resolver());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|n| {
                            resolver
                                .resolve(&format!("border-{}", (n + i) % 10))
                                .map(|u| u.declarations.clone())
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for decls in handle.join().unwrap() {
                assert!(decls.is_some());
            }
        }
        assert_eq!(resolver.cache_len(), 10);
    }
}
