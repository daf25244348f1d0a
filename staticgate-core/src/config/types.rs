//! Configuration type definitions
//!
//! These types describe routes and the handlers mounted on them. Every
//! handler can be rebuilt from its [`HandlerConfig`] and converted back to
//! one, so a router can persist and reload its table.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for Staticgate
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticGateConfig {
    /// Route table, matched by longest path prefix
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Route configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteConfig {
    /// Path prefix to match
    pub path: String,

    /// Handler for this route
    pub handler: HandlerConfig,
}

/// Handler configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Static files below a base directory, restricted by extension
    ServeStatic {
        /// Positional `[base_path, [extensions...]]`
        args: ServeStaticArgs,
    },

    /// Respond with a fixed status and optional body
    Respond {
        #[serde(default = "default_status_code")]
        status: u16,
        #[serde(default)]
        body: Option<String>,
    },
}

impl HandlerConfig {
    /// Short name of the handler kind, for logs and listings
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerConfig::ServeStatic { .. } => "serve_static",
            HandlerConfig::Respond { .. } => "respond",
        }
    }
}

fn default_status_code() -> u16 {
    200
}

/// Positional arguments of the static file handler.
///
/// Serializes as a two-element array: the base directory followed by the
/// list of allowed extensions, e.g. `["/srv/static", ["txt", "png"]]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServeStaticArgs(pub PathBuf, pub Vec<String>);

impl ServeStaticArgs {
    pub fn new(base_path: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self(base_path.into(), extensions)
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.0
    }

    pub fn extensions(&self) -> &[String] {
        &self.1
    }
}

impl From<ServeStaticArgs> for HandlerConfig {
    fn from(args: ServeStaticArgs) -> Self {
        HandlerConfig::ServeStatic { args }
    }
}
