//! Session configuration read from JSON.
//!
//! ```json
//! {
//!   "loader": { "skip_synthetic_members": false },
//!   "stop_on_error": true
//! }
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use anyhow::{Context, Result};
use clsem_classfile::LoaderOptions;
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClsemConfig {
    pub loader: LoaderOptions,
    /// Abort `Session::load_all` at the first class that fails to load.
    pub stop_on_error: bool,
}

impl ClsemConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid clsem configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
