//! Loader options.

use serde::Deserialize;

/// Knobs for turning class files into symbols.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LoaderOptions {
    /// Create package levels that a binary class name walks through but
    /// that do not exist yet. When off, a missing level fails decoding.
    pub create_missing_packages: bool,
    /// Do not enter synthetic members or bridge methods.
    pub skip_synthetic_members: bool,
    /// Classify `ACC_SYNTHETIC` classes without pickle markers as artifacts.
    pub synthetic_classes_are_artifacts: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            create_missing_packages: true,
            skip_synthetic_members: true,
            synthetic_classes_are_artifacts: true,
        }
    }
}
