//! Rejection taxonomy for static file requests
//!
//! Variants carry enough context to diagnose a refusal in the logs. None of
//! it ever reaches the client, which only sees a 403.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a static file request was refused
#[derive(Error, Debug)]
pub enum Rejection {
    /// Candidate directory escapes the base, is not canonical, or is missing
    #[error("requested file folder is not allowed: {}", .path.display())]
    DirectoryNotAllowed {
        path: PathBuf,
        canonical: Option<PathBuf>,
    },

    /// Extension absent from the allow-list
    #[error("extension {extension:?} is not allowed")]
    ExtensionNotAllowed { path: PathBuf, extension: String },

    /// Extension allowed but nothing servable on disk
    #[error("requested file does not exist: {}", .path.display())]
    FileNotExists { path: PathBuf },

    /// I/O failure while resolving or serving
    #[error("unexpected error on {}: {source}", .path.display())]
    Unexpected {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Rejection {
    /// Filesystem path the rejection refers to
    pub fn path(&self) -> &Path {
        match self {
            Rejection::DirectoryNotAllowed { path, .. }
            | Rejection::ExtensionNotAllowed { path, .. }
            | Rejection::FileNotExists { path }
            | Rejection::Unexpected { path, .. } => path,
        }
    }

    pub(crate) fn log(&self, request_path: &str) {
        match self {
            Rejection::DirectoryNotAllowed { path, canonical } => tracing::warn!(
                request = request_path,
                path = %path.display(),
                canonical = ?canonical,
                "🚫 directory not allowed"
            ),
            Rejection::ExtensionNotAllowed { path, extension } => tracing::warn!(
                request = request_path,
                path = %path.display(),
                extension = extension.as_str(),
                "🚫 extension not allowed"
            ),
            Rejection::FileNotExists { path } => tracing::warn!(
                request = request_path,
                path = %path.display(),
                "🚫 file does not exist"
            ),
            Rejection::Unexpected { path, source } => tracing::error!(
                request = request_path,
                path = %path.display(),
                error = %source,
                "failed to serve static file"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let rejection = Rejection::ExtensionNotAllowed {
            path: PathBuf::from("/srv/static/report.pdf"),
            extension: "pdf".into(),
        };
        assert_eq!(rejection.to_string(), "extension \"pdf\" is not allowed");
        assert_eq!(rejection.path(), &PathBuf::from("/srv/static/report.pdf"));

        let rejection = Rejection::DirectoryNotAllowed {
            path: PathBuf::from("/srv/static/.."),
            canonical: Some(PathBuf::from("/srv")),
        };
        assert!(rejection.to_string().contains("/srv/static/.."));
    }
}
