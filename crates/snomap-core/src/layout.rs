//! File locations for a mapping run.

use std::path::{Path, PathBuf};

/// Success table file name.
pub const SUCCESS_TABLE: &str = "output_codes.csv";
/// Failure table file name.
pub const FAILURE_TABLE: &str = "failed_codes.csv";
/// Raw response directory, relative to the output root.
pub const ARTIFACT_DIR: &str = "output/json";

/// Paths of the two output tables and the artifact directory under one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn success_table(&self) -> PathBuf {
        self.root.join(SUCCESS_TABLE)
    }

    pub fn failure_table(&self) -> PathBuf {
        self.root.join(FAILURE_TABLE)
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.root.join(ARTIFACT_DIR)
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
