//! Route rule definitions.
//!
//! # Responsibilities
//! - Describe one console-facing endpoint: method, path shape, backend
//!   target, auth requirement
//! - Parse path patterns into segment lists for exact matching
//!
//! # Design Decisions
//! - Patterns are segment lists, not regexes: O(n) matching, no surprises
//! - A pattern holds at most one `{placeholder}` segment (the resource)
//! - `requires_auth` is a first-class field so the auth policy is
//!   unit-testable without any HTTP wiring

use axum::http::Method;

/// Backend system a route forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Mesh control plane (namespaces, services, rules).
    MeshServer,
    /// HR directory lookups.
    Directory,
    /// Log search backend.
    LogStore,
    /// Monitoring range-query backend.
    Monitor,
    /// The console index page, served locally. Not proxied.
    ConsolePage,
}

impl Target {
    /// Short name for logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::MeshServer => "mesh_server",
            Target::Directory => "directory",
            Target::LogStore => "log_store",
            Target::Monitor => "monitor",
            Target::ConsolePage => "console_page",
        }
    }
}

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must match the request segment exactly.
    Literal(String),
    /// Matches any single non-empty request segment.
    Param,
}

/// A parsed path pattern, e.g. `/naming/{resource}/token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern string. Segments wrapped in `{}` become placeholders.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    /// True if the request path segments match this pattern.
    pub fn matches(&self, path_segments: &[&str]) -> bool {
        if path_segments.len() != self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(path_segments)
            .all(|(pat, seg)| match pat {
                Segment::Literal(lit) => lit == seg,
                Segment::Param => !seg.is_empty(),
            })
    }

    /// Number of literal segments. Higher wins when several patterns match.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Index of the placeholder segment, if the pattern has one.
    pub fn param_index(&self) -> Option<usize> {
        self.segments.iter().position(|s| matches!(s, Segment::Param))
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Static descriptor for one console endpoint.
#[derive(Debug, Clone)]
pub struct RouteRule {
    /// Identifier for logs and metrics, e.g. `create-namespace`.
    pub name: &'static str,
    pub method: Method,
    pub pattern: PathPattern,
    pub target: Target,
    /// Whether a verified identity assertion is required before forwarding.
    pub requires_auth: bool,
}

impl RouteRule {
    pub fn new(
        name: &'static str,
        method: Method,
        pattern: &str,
        target: Target,
        requires_auth: bool,
    ) -> Self {
        Self {
            name,
            method,
            pattern: PathPattern::parse(pattern),
            target,
            requires_auth,
        }
    }
}

/// Split a request path into non-empty segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}
