//! Resource extraction and validation.
//!
//! # Responsibilities
//! - Pull the `{resource}` placeholder value out of a matched path
//! - Validate it against the closed set of mesh resource kinds
//! - Produce the per-request `ResolvedRequest` consumed by the forwarder
//!
//! # Design Decisions
//! - Validation happens before any outbound call, so arbitrary backend
//!   paths cannot be probed through the placeholder
//! - The kind set mirrors the mesh-server contract; it is not extensible
//!   at runtime

use std::str::FromStr;

use crate::error::GatewayError;
use crate::routing::rule::{path_segments, RouteRule};

/// The closed set of mesh resource kinds the console may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Namespaces,
    Services,
    Instances,
    Routings,
    Ratelimits,
    Circuitbreakers,
    Aliases,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Namespaces => "namespaces",
            ResourceKind::Services => "services",
            ResourceKind::Instances => "instances",
            ResourceKind::Routings => "routings",
            ResourceKind::Ratelimits => "ratelimits",
            ResourceKind::Circuitbreakers => "circuitbreakers",
            ResourceKind::Aliases => "aliases",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "namespaces" => Ok(ResourceKind::Namespaces),
            "services" => Ok(ResourceKind::Services),
            "instances" => Ok(ResourceKind::Instances),
            "routings" => Ok(ResourceKind::Routings),
            "ratelimits" => Ok(ResourceKind::Ratelimits),
            "circuitbreakers" => Ok(ResourceKind::Circuitbreakers),
            "aliases" => Ok(ResourceKind::Aliases),
            _ => Err(GatewayError::InvalidResource),
        }
    }
}

/// Everything the forwarder needs about one matched request.
///
/// Created once per inbound request, owned by that request's handling,
/// discarded when the request completes.
#[derive(Debug)]
pub struct ResolvedRequest<'t> {
    pub rule: &'t RouteRule,
    /// Validated placeholder value, when the rule's pattern has one.
    pub resource: Option<ResourceKind>,
    /// The concrete console-facing path.
    pub path: String,
    /// The original query string, untouched.
    pub query: Option<String>,
}

/// Resolve a matched rule against the concrete path.
///
/// Fails with `InvalidResource` when the placeholder value is not a known
/// resource kind.
pub fn resolve<'t>(
    rule: &'t RouteRule,
    path: &str,
    query: Option<&str>,
) -> Result<ResolvedRequest<'t>, GatewayError> {
    let resource = match rule.pattern.param_index() {
        Some(idx) => {
            let segments = path_segments(path);
            let value = segments.get(idx).ok_or(GatewayError::InvalidResource)?;
            Some(ResourceKind::from_str(value)?)
        }
        None => None,
    };

    Ok(ResolvedRequest {
        rule,
        resource,
        path: path.to_string(),
        query: query.map(|q| q.to_string()),
    })
}
