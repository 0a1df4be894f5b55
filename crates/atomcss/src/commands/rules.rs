/*
 * rules.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rules command implementation
 */

//! Rules command implementation.
//!
//! Lists the registry in precedence order: index, kind, layer and the
//! static token or pattern of every entry.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use atomcss_core::Registry;
use atomcss_core::css::DEFAULT_LAYER;

use super::load_resolver;

/// Arguments for the rules command
#[derive(Debug)]
pub struct RulesArgs {
    pub config: Option<PathBuf>,
}

/// Execute the rules command
pub fn execute(args: RulesArgs) -> Result<()> {
    let resolver = load_resolver(args.config.as_deref())?;
    let stdout = io::stdout();
    run(resolver.registry(), &mut stdout.lock())
}

pub fn run(registry: &Registry, out: &mut impl Write) -> Result<()> {
    for (index, entry) in registry.entries().iter().enumerate() {
        let kind = if entry.is_static() { "static" } else { "pattern" };
        let layer = entry.meta().layer.as_deref().unwrap_or(DEFAULT_LAYER);
        writeln!(out, "{:>3}  {:<7}  {:<8}  {}", index, kind, layer, entry.describe())?;
    }
    Ok(())
}
