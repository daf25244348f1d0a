//! File server implementation

use crate::error::Rejection;
use crate::mime::{MimeGuess, MimeLookup, content_type_for};
use crate::resolver::ResolvedTarget;
use http::StatusCode;
use staticgate_core::ResponseSink;
use std::fs;
use std::sync::Arc;

/// Writes resolved files to a response sink
#[derive(Clone)]
pub struct FileServer {
    mime: Arc<dyn MimeLookup>,
}

impl Default for FileServer {
    fn default() -> Self {
        Self::new(Arc::new(MimeGuess))
    }
}

impl std::fmt::Debug for FileServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileServer").finish_non_exhaustive()
    }
}

impl FileServer {
    /// Create a file server using a custom MIME lookup
    pub fn new(mime: Arc<dyn MimeLookup>) -> Self {
        Self { mime }
    }

    /// Serve a resolved file, returning the number of body bytes delivered.
    ///
    /// The whole file is read before anything is written to the sink, so
    /// every filesystem failure surfaces as a [`Rejection`] while the sink is
    /// still untouched. Once the 200 head is out, a failing
    /// [`ResponseSink::write_body`] is a transport problem: it is logged and
    /// the response is left alone.
    pub fn serve(
        &self,
        target: &ResolvedTarget,
        sink: &mut dyn ResponseSink,
    ) -> Result<u64, Rejection> {
        let path = target.path();
        let content = fs::read(&path).map_err(|source| Rejection::Unexpected {
            path: path.clone(),
            source,
        })?;
        let length = content.len() as u64;
        let content_type = content_type_for(self.mime.as_ref(), target.extension());

        sink.set_status(StatusCode::OK);
        sink.set_header("Content-Type", &content_type);
        sink.set_header("Content-Length", &length.to_string());
        sink.set_header(
            "Content-Disposition",
            &format!("inline; filename=\"{}\"", disposition_filename(target.filename())),
        );

        if let Err(e) = sink.write_body(&content) {
            tracing::error!(
                path = %path.display(),
                bytes = length,
                error = %e,
                "response body write failed after headers were sent"
            );
            return Ok(0);
        }

        tracing::debug!(
            path = %path.display(),
            content_type = content_type.as_str(),
            bytes = length,
            "✅ served static file"
        );
        Ok(length)
    }
}

/// Quote-safe file name for `Content-Disposition`
fn disposition_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control())
        .flat_map(|c| match c {
            '"' | '\\' => vec!['\\', c],
            c => vec![c],
        })
        .collect()
}
