//! Route handlers and response sinks
//!
//! Handlers never write to a process-wide response. The router passes a
//! [`ResponseSink`] into [`RouteHandler::on_route`] and the handler drives it
//! through status, headers and body.

use crate::config::HandlerConfig;
use crate::error::{Error, Result};
use bytes::{BufMut, Bytes, BytesMut};
use http::StatusCode;
use std::collections::HashMap;
use std::io;

/// Destination of a handler's response
pub trait ResponseSink {
    /// Set the response status
    fn set_status(&mut self, status: StatusCode);

    /// Set a response header, replacing an earlier value of the same name
    fn set_header(&mut self, name: &str, value: &str);

    /// Append bytes to the response body.
    ///
    /// An error here belongs to the transport (e.g. the client went away).
    /// Status and headers may already be on the wire, so handlers log it and
    /// leave the response as it is.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;
}

/// A handler mounted on a route.
///
/// `params[0]` is the request path matched by the router. Any further
/// positional parameters are accepted and ignored.
pub trait RouteHandler: Send + Sync {
    /// Handle one request, writing the outcome to `sink`
    fn on_route(&self, params: &[&str], sink: &mut dyn ResponseSink);

    /// Convert the handler back to the configuration it was built from
    fn to_config(&self) -> HandlerConfig;

    /// Build the handler from configuration
    fn from_config(config: HandlerConfig) -> Result<Self>
    where
        Self: Sized;
}

/// In-memory response sink
#[derive(Debug, Default, Clone)]
pub struct RecordedResponse {
    pub status: Option<StatusCode>,
    pub headers: HashMap<String, String>,
    body: BytesMut,
}

impl RecordedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header, ignoring ASCII case of the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

impl ResponseSink for RecordedResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.to_string());
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.body.put_slice(chunk);
        Ok(())
    }
}

/// Responds with a fixed status and optional plain-text body
#[derive(Debug, Clone)]
pub struct RespondHandler {
    status: StatusCode,
    body: Option<String>,
}

impl RespondHandler {
    pub fn new(status: StatusCode, body: Option<String>) -> Self {
        Self { status, body }
    }
}

impl RouteHandler for RespondHandler {
    fn on_route(&self, _params: &[&str], sink: &mut dyn ResponseSink) {
        sink.set_status(self.status);

        if let Some(body) = &self.body {
            sink.set_header("Content-Type", "text/plain; charset=utf-8");
            sink.set_header("Content-Length", &body.len().to_string());
            if let Err(e) = sink.write_body(body.as_bytes()) {
                tracing::error!(error = %e, "failed to write respond body");
            }
        }
    }

    fn to_config(&self) -> HandlerConfig {
        HandlerConfig::Respond {
            status: self.status.as_u16(),
            body: self.body.clone(),
        }
    }

    fn from_config(config: HandlerConfig) -> Result<Self> {
        match config {
            HandlerConfig::Respond { status, body } => {
                let status = StatusCode::from_u16(status)
                    .map_err(|e| Error::Config(format!("Invalid status {}: {}", status, e)))?;
                Ok(Self::new(status, body))
            }
            other => Err(Error::Config(format!(
                "Expected a respond handler, got {}",
                other.kind()
            ))),
        }
    }
}
