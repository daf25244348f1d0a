//! MIME type handling

/// Content type used when the lookup has no entry for an extension
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension to content type lookup
pub trait MimeLookup: Send + Sync {
    /// Content type for an extension (without the dot), if known
    fn lookup(&self, extension: &str) -> Option<String>;
}

/// Lookup backed by the `mime_guess` table
#[derive(Debug, Default, Clone, Copy)]
pub struct MimeGuess;

impl MimeLookup for MimeGuess {
    fn lookup(&self, extension: &str) -> Option<String> {
        mime_guess::from_ext(extension).first_raw().map(str::to_string)
    }
}

/// Get the content type for an extension, never empty
pub fn content_type_for(lookup: &dyn MimeLookup, extension: &str) -> String {
    lookup
        .lookup(extension)
        .filter(|content_type| !content_type.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
