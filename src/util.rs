use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::ILLEGAL_FILENAME_PATTERN;

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Strips characters that are illegal in filesystem paths. Holds the
/// compiled pattern; build once per run.
pub struct Sanitizer {
    illegal: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            illegal: Regex::new(ILLEGAL_FILENAME_PATTERN)
                .context("failed to compile illegal filename character regex")?,
        })
    }

    /// Idempotent: sanitizing a sanitized title is a no-op.
    pub fn sanitize(&self, title: &str) -> String {
        self.illegal.replace_all(title, "").into_owned()
    }
}
