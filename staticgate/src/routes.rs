//! Prefix route table
//!
//! Routes are matched on whole path segments, longest prefix first. The
//! matched prefix is stripped and the remainder handed to the handler as its
//! request path parameter.

use http::StatusCode;
use staticgate_core::config::{HandlerConfig, RouteConfig, StaticGateConfig};
use staticgate_core::{RespondHandler, ResponseSink, Result, RouteHandler};
use staticgate_static::ServeStatic;

/// Build a handler from its configuration
pub fn build_handler(config: HandlerConfig) -> Result<Box<dyn RouteHandler>> {
    Ok(match config {
        config @ HandlerConfig::ServeStatic { .. } => Box::new(ServeStatic::from_config(config)?),
        config @ HandlerConfig::Respond { .. } => Box::new(RespondHandler::from_config(config)?),
    })
}

struct MountedRoute {
    prefix: String,
    handler: Box<dyn RouteHandler>,
}

/// Handlers mounted on path prefixes
pub struct RouteTable {
    routes: Vec<MountedRoute>,
}

impl RouteTable {
    /// Build every handler of the configuration
    pub fn from_config(config: &StaticGateConfig) -> Result<Self> {
        let mut routes = config
            .routes
            .iter()
            .map(|route| {
                Ok(MountedRoute {
                    prefix: normalize_prefix(&route.path),
                    handler: build_handler(route.handler.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Longest prefix wins; stable sort keeps file order among equals
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        for route in &routes {
            tracing::debug!(
                prefix = %route.prefix,
                handler = route.handler.to_config().kind(),
                "mounted route"
            );
        }

        Ok(Self { routes })
    }

    /// Rebuild the configuration from the mounted handlers
    pub fn to_config(&self) -> StaticGateConfig {
        StaticGateConfig {
            routes: self
                .routes
                .iter()
                .map(|route| RouteConfig {
                    path: if route.prefix.is_empty() {
                        "/".to_string()
                    } else {
                        route.prefix.clone()
                    },
                    handler: route.handler.to_config(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatch a request. Unmatched requests get a bare 404.
    pub fn dispatch(&self, request_path: &str, extra: &[&str], sink: &mut dyn ResponseSink) {
        let Some((route, remainder)) = self.routes.iter().find_map(|route| {
            strip_route_prefix(&route.prefix, request_path).map(|rest| (route, rest))
        }) else {
            tracing::debug!(request = request_path, "no route matched");
            sink.set_status(StatusCode::NOT_FOUND);
            return;
        };

        tracing::debug!(request = request_path, prefix = %route.prefix, remainder, "dispatching");

        let mut params = Vec::with_capacity(extra.len() + 1);
        params.push(remainder);
        params.extend_from_slice(extra);
        route.handler.on_route(&params, sink);
    }
}

/// `/static/` and `/static` are the same prefix; `/` is the catch-all
fn normalize_prefix(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

/// Remainder of `request_path` after `prefix`, if the prefix ends on a
/// segment boundary
fn strip_route_prefix<'a>(prefix: &str, request_path: &'a str) -> Option<&'a str> {
    let rest = request_path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
        Some(rest)
    } else {
        None
    }
}
