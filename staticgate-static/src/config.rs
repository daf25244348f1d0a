//! Static handler configuration

use staticgate_core::config::ServeStaticArgs;
use staticgate_core::{Error, Result};
use std::path::PathBuf;

/// Base directory and extension allow-list of a static handler.
///
/// Construction accepts anything. The base path is only checked when a
/// request is resolved against it; [`ServeStaticConfig::validate`] reports
/// the same problems up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeStaticConfig {
    /// Root directory; must be absolute and canonical to serve anything
    pub base_path: PathBuf,
    /// Extensions without the leading dot, compared case-sensitively
    pub allowed_extensions: Vec<String>,
}

impl ServeStaticConfig {
    pub fn new<I, S>(base_path: impl Into<PathBuf>, allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_path: base_path.into(),
            allowed_extensions: allowed_extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive allow-list lookup. Empty never matches.
    pub fn allows_extension(&self, extension: &str) -> bool {
        !extension.is_empty() && self.allowed_extensions.iter().any(|e| e == extension)
    }

    /// Check what request resolution would otherwise only find out lazily
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !self.base_path.is_absolute() {
            problems.push(format!("base path {} is not absolute", self.base_path.display()));
        }
        match std::fs::canonicalize(&self.base_path) {
            Ok(canonical) if !canonical.is_dir() => {
                problems.push(format!("base path {} is not a directory", self.base_path.display()));
            }
            Ok(canonical) if canonical != self.base_path => problems.push(format!(
                "base path {} is not canonical (resolves to {})",
                self.base_path.display(),
                canonical.display()
            )),
            Ok(_) => {}
            Err(e) => problems.push(format!("base path {}: {}", self.base_path.display(), e)),
        }

        if self.allowed_extensions.is_empty() {
            problems.push("no extensions are allowed".to_string());
        }
        for ext in &self.allowed_extensions {
            if ext.is_empty() {
                problems.push("empty extension entry is never matched".to_string());
            } else if ext.starts_with('.') {
                problems.push(format!("extension {:?} must not start with '.'", ext));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }

    /// Positional `[base_path, extensions]` form
    pub fn to_args(&self) -> ServeStaticArgs {
        ServeStaticArgs::new(self.base_path.clone(), self.allowed_extensions.clone())
    }
}

impl From<ServeStaticArgs> for ServeStaticConfig {
    fn from(ServeStaticArgs(base_path, allowed_extensions): ServeStaticArgs) -> Self {
        Self { base_path, allowed_extensions }
    }
}
