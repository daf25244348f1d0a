//! Staticgate Static File Module
//!
//! Serves files below a single base directory, restricted to an allow-list
//! of extensions:
//! - Traversal defense by canonical path comparison
//! - Case-sensitive extension allow-list
//! - MIME type detection with a generic fallback
//! - Fail-closed dispatch: every failure is a bare 403

mod config;
mod error;
mod file_server;
mod mime;
mod resolver;
mod serve_static;

pub use config::ServeStaticConfig;
pub use error::Rejection;
pub use file_server::FileServer;
pub use mime::{FALLBACK_CONTENT_TYPE, MimeGuess, MimeLookup, content_type_for};
pub use resolver::{ResolvedTarget, StaticFileResolver};
pub use serve_static::ServeStatic;
