//! Command implementations for the atomcss CLI
//!
//! Each command module turns its arguments into a resolver (or theme) via
//! [`crate::config::ConfigFile`] and writes its report to a writer, so the
//! commands can be exercised without a terminal.

pub mod resolve;
pub mod rules;
pub mod theme;

use std::path::Path;

use anyhow::{Context, Result};
use atomcss_core::Resolver;

use crate::config::ConfigFile;

/// Build a resolver from an optional config file path.
pub fn load_resolver(config: Option<&Path>) -> Result<Resolver> {
    let config = ConfigFile::load(config)?
        .into_resolver_config()
        .context("Failed to assemble resolver configuration")?;
    Ok(Resolver::new(config))
}
