//! Static file route handler

use crate::config::ServeStaticConfig;
use crate::error::Rejection;
use crate::file_server::FileServer;
use crate::mime::MimeLookup;
use crate::resolver::StaticFileResolver;
use http::StatusCode;
use staticgate_core::config::{HandlerConfig, ServeStaticArgs};
use staticgate_core::{Error, ResponseSink, Result, RouteHandler};
use std::path::PathBuf;
use std::sync::Arc;

/// Serves allow-listed files below a base directory.
///
/// Every failure, whatever its cause, is answered with a bare 403: no
/// headers, no body. The cause is only logged.
#[derive(Debug, Clone)]
pub struct ServeStatic {
    resolver: StaticFileResolver,
    server: FileServer,
}

impl ServeStatic {
    /// Create a handler for `base_path` allowing the given extensions
    pub fn new<I, S>(base_path: impl Into<PathBuf>, allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_static_config(ServeStaticConfig::new(base_path, allowed_extensions))
    }

    pub fn from_static_config(config: ServeStaticConfig) -> Self {
        Self {
            resolver: StaticFileResolver::new(config),
            server: FileServer::default(),
        }
    }

    /// Replace the MIME lookup used for `Content-Type`
    pub fn with_mime_lookup(mut self, mime: Arc<dyn MimeLookup>) -> Self {
        self.server = FileServer::new(mime);
        self
    }

    pub fn config(&self) -> &ServeStaticConfig {
        self.resolver.config()
    }

    /// Resolve and serve, surfacing the rejection instead of a 403
    pub fn handle(
        &self,
        request_path: &str,
        sink: &mut dyn ResponseSink,
    ) -> std::result::Result<u64, Rejection> {
        let target = self.resolver.resolve(request_path)?;
        self.server.serve(&target, sink)
    }
}

impl From<ServeStaticArgs> for ServeStatic {
    fn from(args: ServeStaticArgs) -> Self {
        Self::from_static_config(args.into())
    }
}

impl RouteHandler for ServeStatic {
    /// A rejection always happens before the sink is touched, so the 403
    /// goes out bare. Body write failures after a 200 are not rejections.
    fn on_route(&self, params: &[&str], sink: &mut dyn ResponseSink) {
        let request_path = params.first().copied().unwrap_or_default();

        if let Err(rejection) = self.handle(request_path, sink) {
            rejection.log(request_path);
            sink.set_status(StatusCode::FORBIDDEN);
        }
    }

    fn to_config(&self) -> HandlerConfig {
        self.config().to_args().into()
    }

    fn from_config(config: HandlerConfig) -> Result<Self> {
        match config {
            HandlerConfig::ServeStatic { args } => Ok(args.into()),
            other => Err(Error::Config(format!(
                "Expected a serve_static handler, got {}",
                other.kind()
            ))),
        }
    }
}
