/*
 * theme.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Theme command implementation
 */

//! Theme command implementation.
//!
//! Prints the merged theme, or the value at a dotted path such as
//! `colors.red.500`, as JSON or YAML.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::Serialize;

use atomcss_core::Theme;

use super::load_resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeFormat {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the theme command
#[derive(Debug)]
pub struct ThemeArgs {
    /// Dotted path into the theme
    pub path: Option<String>,
    pub config: Option<PathBuf>,
    pub format: ThemeFormat,
}

/// Execute the theme command
pub fn execute(args: ThemeArgs) -> Result<()> {
    let resolver = load_resolver(args.config.as_deref())?;
    let stdout = io::stdout();
    run(resolver.theme(), &args, &mut stdout.lock())
}

pub fn run(theme: &Theme, args: &ThemeArgs, out: &mut impl Write) -> Result<()> {
    let Some(path) = args.path.as_deref() else {
        return write_value(theme, args.format, out);
    };
    let segments: Vec<&str> = path.split('.').collect();
    match segments.as_slice() {
        [category] => match theme.category(category) {
            Some(entries) => write_value(entries, args.format, out),
            None => bail!("Theme has no category `{}`", category),
        },
        _ => match theme.lookup_path(&segments) {
            Some(value) => write_value(value, args.format, out),
            None => bail!("Theme has no value at `{}`", path),
        },
    }
}

fn write_value<T: Serialize + ?Sized>(
    value: &T,
    format: ThemeFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        ThemeFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        ThemeFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
    }
    Ok(())
}
