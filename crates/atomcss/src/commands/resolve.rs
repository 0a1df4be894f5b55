/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolve command implementation
 */

//! Resolve command implementation.
//!
//! Resolves utility tokens and prints either a stylesheet or the resolved
//! utilities as JSON. Tokens come from the command line, or from standard
//! input (whitespace separated) when none are given.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::{info, warn};

use atomcss_core::{Resolver, to_css};

use super::load_resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ResolveFormat {
    #[default]
    Css,
    Json,
}

/// Arguments for the resolve command
#[derive(Debug)]
pub struct ResolveArgs {
    pub tokens: Vec<String>,
    pub config: Option<PathBuf>,
    pub format: ResolveFormat,
    /// Report every matching entry instead of the winner (JSON only)
    pub all: bool,
    /// Fail when any token is left unmatched
    pub strict: bool,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let mut tokens = args.tokens.clone();
    if tokens.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read tokens from stdin")?;
        tokens = input.split_whitespace().map(str::to_string).collect();
    }

    let resolver = load_resolver(args.config.as_deref())?;
    let stdout = io::stdout();
    run(&resolver, &tokens, &args, &mut stdout.lock())
}

/// Resolve `tokens` and write the report to `out`.
pub fn run(
    resolver: &Resolver,
    tokens: &[String],
    args: &ResolveArgs,
    out: &mut impl Write,
) -> Result<()> {
    let unmatched: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| resolver.resolve(token).is_none())
        .collect();
    for token in &unmatched {
        warn!(token, "No rule matched");
    }

    if args.all {
        let mut json = serde_json::Map::new();
        for token in tokens {
            json.insert(
                token.clone(),
                serde_json::to_value(resolver.resolve_all(token))?,
            );
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        let utilities = resolver.resolve_many(tokens.iter().map(String::as_str));
        info!(
            resolved = utilities.len(),
            unmatched = unmatched.len(),
            "Resolved tokens"
        );
        match args.format {
            ResolveFormat::Css => writeln!(out, "{}", to_css(&utilities))?,
            ResolveFormat::Json => {
                let plain: Vec<_> = utilities.iter().map(|u| u.as_ref()).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&plain)?)?;
            }
        }
    }

    if args.strict && !unmatched.is_empty() {
        anyhow::bail!("Unmatched tokens: {}", unmatched.join(" "));
    }
    Ok(())
}
