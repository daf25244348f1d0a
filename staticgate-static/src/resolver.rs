//! Request path resolution and access control

use crate::config::ServeStaticConfig;
use crate::error::Rejection;
use std::path::{Path, PathBuf};

/// A file that passed every check.
///
/// Only [`StaticFileResolver::resolve`] creates these, so anything holding
/// one refers to an existing, allow-listed file inside the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    directory: PathBuf,
    filename: String,
    extension: String,
}

impl ResolvedTarget {
    /// Canonical directory containing the file
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full path of the file
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Maps untrusted request paths to files below the configured base
#[derive(Debug, Clone)]
pub struct StaticFileResolver {
    config: ServeStaticConfig,
}

impl StaticFileResolver {
    pub fn new(config: ServeStaticConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServeStaticConfig {
        &self.config
    }

    /// Resolve a request path, stopping at the first failed check
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedTarget, Rejection> {
        let request_path = strip_query(request_path);
        let (dir, filename) = split_request_path(request_path);

        let directory = self.candidate_directory(dir);
        check_directory(&directory)?;

        let path = directory.join(filename);
        let extension = file_extension(filename);

        if !self.config.allows_extension(extension) {
            return Err(Rejection::ExtensionNotAllowed {
                path,
                extension: extension.to_string(),
            });
        }

        // Directories named like files are not servable either
        if !path.is_file() {
            return Err(Rejection::FileNotExists { path });
        }

        tracing::debug!("📁 Resolved request: {} -> {:?}", request_path, path);

        Ok(ResolvedTarget {
            directory,
            filename: filename.to_string(),
            extension: extension.to_string(),
        })
    }

    /// Base joined with the request's directory part; leading separators
    /// stay relative to the base.
    fn candidate_directory(&self, dir: &str) -> PathBuf {
        let dir = dir.trim_start_matches('/');
        if dir.is_empty() || dir == "." {
            self.config.base_path.clone()
        } else {
            self.config.base_path.join(dir)
        }
    }
}

/// Drop everything from the first `?`
fn strip_query(request_path: &str) -> &str {
    request_path
        .split_once('?')
        .map_or(request_path, |(path, _)| path)
}

/// Split at the last `/` into directory part and final file name.
///
/// Segments are taken as written: `.` and `..` stay file names, and a
/// trailing `/` leaves the file name empty.
fn split_request_path(request_path: &str) -> (&str, &str) {
    request_path.rsplit_once('/').unwrap_or(("", request_path))
}

/// Text after the last `.` of the file name, or empty without one.
/// `.png` has extension `png`; `.` and `..` have none.
fn file_extension(filename: &str) -> &str {
    filename.rsplit_once('.').map_or("", |(_, extension)| extension)
}

/// The candidate must already be canonical. `..` segments and symlinks
/// canonicalize to a different path and are refused, as is anything that
/// is not an existing directory.
fn check_directory(candidate: &Path) -> Result<(), Rejection> {
    match std::fs::canonicalize(candidate) {
        Ok(canonical) if canonical.as_path() == candidate && canonical.is_dir() => Ok(()),
        Ok(canonical) => Err(Rejection::DirectoryNotAllowed {
            path: candidate.to_path_buf(),
            canonical: Some(canonical),
        }),
        Err(_) => Err(Rejection::DirectoryNotAllowed {
            path: candidate.to_path_buf(),
            canonical: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// `<tmp>/static` as base, with a secret file next to it
    fn fixture() -> (TempDir, StaticFileResolver) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let base = root.join("static");

        fs::create_dir_all(base.join("docs")).unwrap();
        fs::create_dir_all(base.join("folder.txt")).unwrap();
        fs::write(base.join("report.txt"), "quarterly numbers").unwrap();
        fs::write(base.join("report.pdf"), "%PDF-1.4").unwrap();
        fs::write(base.join("shout.TXT"), "LOUD").unwrap();
        fs::write(base.join("README"), "no extension").unwrap();
        fs::write(base.join("archive.tar.gz"), [0x1f, 0x8b]).unwrap();
        fs::write(base.join("docs/guide.txt"), "guide").unwrap();
        fs::write(base.join(".png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(root.join("secret.txt"), "top secret").unwrap();

        let config = ServeStaticConfig::new(base, ["txt", "png", "gz", ""]);
        (dir, StaticFileResolver::new(config))
    }

    #[test]
    fn test_resolves_file_in_base() {
        let (_dir, resolver) = fixture();
        let target = resolver.resolve("/report.txt").unwrap();
        assert_eq!(target.filename(), "report.txt");
        assert_eq!(target.extension(), "txt");
        assert_eq!(target.directory(), resolver.config().base_path.as_path());
        assert_eq!(fs::read(target.path()).unwrap(), b"quarterly numbers");
    }

    #[test]
    fn test_leading_slash_is_optional() {
        let (_dir, resolver) = fixture();
        assert_eq!(
            resolver.resolve("report.txt").unwrap(),
            resolver.resolve("/report.txt").unwrap()
        );
        assert_eq!(
            resolver.resolve("docs/guide.txt").unwrap(),
            resolver.resolve("/docs/guide.txt").unwrap()
        );
    }

    #[test]
    fn test_resolves_nested_file() {
        let (_dir, resolver) = fixture();
        let target = resolver.resolve("/docs/guide.txt").unwrap();
        assert_eq!(target.directory(), resolver.config().base_path.join("docs"));
    }

    #[test]
    fn test_query_is_ignored() {
        let (_dir, resolver) = fixture();
        assert_eq!(
            resolver.resolve("/report.txt?download=1&x=?").unwrap(),
            resolver.resolve("/report.txt").unwrap()
        );
    }

    #[test]
    fn test_traversal_is_rejected() {
        let (_dir, resolver) = fixture();
        for path in [
            "/../secret.txt",
            "../secret.txt",
            "docs/../../secret.txt",
            "/docs/../report.txt",
        ] {
            let err = resolver.resolve(path).unwrap_err();
            assert!(
                matches!(err, Rejection::DirectoryNotAllowed { .. }),
                "{path}: {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/nowhere/report.txt").unwrap_err();
        assert!(matches!(err, Rejection::DirectoryNotAllowed { canonical: None, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_rejected() {
        let (dir, resolver) = fixture();
        let outside = dir.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(&outside, resolver.config().base_path.join("escape")).unwrap();

        let err = resolver.resolve("/escape/secret.txt").unwrap_err();
        assert!(matches!(err, Rejection::DirectoryNotAllowed { canonical: Some(_), .. }));
    }

    #[test]
    fn test_non_canonical_base_is_rejected() {
        let (_dir, resolver) = fixture();
        let base = &resolver.config().base_path;
        let crooked = base.join("docs").join("..");
        let resolver = StaticFileResolver::new(ServeStaticConfig::new(crooked, ["txt"]));

        let err = resolver.resolve("/report.txt").unwrap_err();
        assert!(matches!(err, Rejection::DirectoryNotAllowed { .. }));
    }

    #[test]
    fn test_disallowed_extension() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/report.pdf").unwrap_err();
        match err {
            Rejection::ExtensionNotAllowed { extension, .. } => assert_eq!(extension, "pdf"),
            other => panic!("unexpected rejection: {other:?}"),
        }
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/shout.TXT").unwrap_err();
        assert!(matches!(err, Rejection::ExtensionNotAllowed { .. }));
    }

    #[test]
    fn test_missing_extension_never_matches_empty_entry() {
        let (_dir, resolver) = fixture();
        for path in ["/README", "", "/", "docs/"] {
            let err = resolver.resolve(path).unwrap_err();
            assert!(
                matches!(err, Rejection::ExtensionNotAllowed { .. }),
                "{path:?}: {err:?}"
            );
        }
    }

    #[test]
    fn test_last_dot_wins() {
        let (_dir, resolver) = fixture();
        let target = resolver.resolve("/archive.tar.gz").unwrap();
        assert_eq!(target.extension(), "gz");
    }

    #[test]
    fn test_dotfile_extension_is_text_after_dot() {
        let (_dir, resolver) = fixture();
        let target = resolver.resolve("/.png").unwrap();
        assert_eq!(target.filename(), ".png");
        assert_eq!(target.extension(), "png");
    }

    #[test]
    fn test_dot_segment_file_name_is_not_dropped() {
        let (_dir, resolver) = fixture();

        // `report.txt` is the directory part here, and it is a file
        let err = resolver.resolve("/report.txt/.").unwrap_err();
        assert!(matches!(err, Rejection::DirectoryNotAllowed { .. }), "{err:?}");

        for path in ["/docs/.", "/.", "/docs/.."] {
            match resolver.resolve(path).unwrap_err() {
                Rejection::ExtensionNotAllowed { extension, .. } => assert_eq!(extension, ""),
                other => panic!("{path}: unexpected rejection: {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/docs/missing.png").unwrap_err();
        assert!(matches!(err, Rejection::FileNotExists { .. }));
    }

    #[test]
    fn test_directory_with_allowed_extension() {
        let (_dir, resolver) = fixture();
        let err = resolver.resolve("/folder.txt").unwrap_err();
        assert!(matches!(err, Rejection::FileNotExists { .. }));
    }

    #[test]
    fn test_split_request_path() {
        assert_eq!(split_request_path("/a/b/c.txt"), ("/a/b", "c.txt"));
        assert_eq!(split_request_path("c.txt"), ("", "c.txt"));
        assert_eq!(split_request_path("/"), ("", ""));
        assert_eq!(split_request_path(""), ("", ""));
        assert_eq!(split_request_path("docs/"), ("docs", ""));
        assert_eq!(split_request_path("/report.txt/."), ("/report.txt", "."));
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension(".png"), "png");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(".."), "");
        assert_eq!(file_extension("README"), "");
        assert_eq!(strip_query("/a.txt?b?c"), "/a.txt");
        assert_eq!(strip_query("?x"), "");
    }
}
