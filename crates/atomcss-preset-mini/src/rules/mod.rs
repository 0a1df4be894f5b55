/*
 * rules/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rule families of the mini preset.
 */

//! Rule families of the mini preset, in registration order.

mod behaviors;

pub use behaviors::{appearance, outline, will_change};

use atomcss_core::{RuleEntry, RuleError};

/// Every rule of the preset, in precedence order.
pub fn rules() -> Result<Vec<RuleEntry>, RuleError> {
    let mut rules = Vec::new();
    rules.extend(outline()?);
    rules.extend(appearance()?);
    rules.extend(will_change()?);
    Ok(rules)
}
