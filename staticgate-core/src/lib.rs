//! Staticgate Core Library
//!
//! Shared building blocks for Staticgate route handlers: the error type,
//! the response sink abstraction, the route handler contract and the
//! configuration types handlers are built from.

pub mod config;
pub mod error;
pub mod handler;

pub use error::{Error, Result};
pub use handler::{RecordedResponse, RespondHandler, ResponseSink, RouteHandler};

/// Staticgate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
