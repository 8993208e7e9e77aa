//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Declare every console endpoint with its backend target and auth flag
//! - Look up the matching rule for (method, path)
//! - Enforce the specificity contract: longest literal prefix wins
//!
//! # Design Decisions
//! - Immutable after construction; shared unsynchronized across requests
//! - Specificity is an explicit, tested invariant, not a side effect of
//!   declaration order
//! - Duplicate (method, pattern) pairs are rejected at build time

use axum::http::Method;

use crate::config::WebConfig;
use crate::routing::rule::{path_segments, RouteRule, Target};

/// Error raised when the declared rules are inconsistent.
#[derive(Debug)]
pub enum RouteTableError {
    /// Two rules share the same method and pattern.
    DuplicateRule { method: Method, pattern: String },
}

impl std::fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteTableError::DuplicateRule { method, pattern } => {
                write!(f, "duplicate route rule: {} {}", method, pattern)
            }
        }
    }
}

impl std::error::Error for RouteTableError {}

/// Ordered, immutable set of route rules.
#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build the console route table.
    ///
    /// `web.request_url` is the deployment-configured prefix for mesh-server
    /// routes; `web.monitor_url` the prefix for monitoring routes.
    pub fn build(web: &WebConfig) -> Result<Self, RouteTableError> {
        use Target::*;

        let base = web.request_url.trim_end_matches('/');
        let monitor = web.monitor_url.trim_end_matches('/');
        let p = |suffix: &str| format!("{}{}", base, suffix);

        let rules = vec![
            RouteRule::new("console-index", Method::GET, "/", ConsolePage, false),
            // Directory lookups
            RouteRule::new("department-list", Method::GET, "/HRFoundation-Unit", Directory, false),
            RouteRule::new("staff-department", Method::GET, "/getStaffDept", Directory, false),
            // Rule change logs
            RouteRule::new("log-search", Method::POST, "/log/search/elasticsearch", LogStore, false),
            // Resource creation
            RouteRule::new("create-namespaces", Method::POST, &p("/namespaces"), MeshServer, false),
            RouteRule::new("create-services", Method::POST, &p("/services"), MeshServer, false),
            RouteRule::new("create-service-alias", Method::POST, &p("/service/alias"), MeshServer, true),
            RouteRule::new("create-instances", Method::POST, &p("/instances"), MeshServer, true),
            RouteRule::new("create-routings", Method::POST, &p("/routings"), MeshServer, true),
            RouteRule::new("create-ratelimits", Method::POST, &p("/ratelimits"), MeshServer, true),
            RouteRule::new("create-circuitbreakers", Method::POST, &p("/circuitbreakers"), MeshServer, false),
            RouteRule::new("create-circuitbreaker-version", Method::POST, &p("/circuitbreakers/version"), MeshServer, true),
            RouteRule::new("release-circuitbreakers", Method::POST, &p("/circuitbreakers/release"), MeshServer, false),
            // Resource reads
            RouteRule::new("describe-resource", Method::GET, &p("/{resource}"), MeshServer, false),
            RouteRule::new("describe-bound-circuitbreaker", Method::GET, &p("/{resource}/circuitbreaker"), MeshServer, false),
            RouteRule::new("describe-master-version", Method::GET, &p("/{resource}/master"), MeshServer, false),
            RouteRule::new("describe-releases", Method::GET, &p("/{resource}/release"), MeshServer, false),
            RouteRule::new("describe-versions", Method::GET, &p("/{resource}/versions"), MeshServer, false),
            RouteRule::new("describe-count", Method::GET, &p("/{resource}/count"), MeshServer, false),
            RouteRule::new("describe-aliases", Method::GET, &p("/{resource}/aliases"), MeshServer, false),
            RouteRule::new("describe-token", Method::GET, &p("/{resource}/token"), MeshServer, true),
            // Resource updates
            RouteRule::new("update-resource", Method::PUT, &p("/{resource}"), MeshServer, true),
            RouteRule::new("update-token", Method::PUT, &p("/{resource}/token"), MeshServer, true),
            // Resource deletion
            RouteRule::new("delete-namespaces", Method::POST, &p("/namespaces/delete"), MeshServer, true),
            RouteRule::new("delete-services", Method::POST, &p("/services/delete"), MeshServer, true),
            RouteRule::new("delete-instances", Method::POST, &p("/instances/delete"), MeshServer, true),
            RouteRule::new("delete-routings", Method::POST, &p("/routings/delete"), MeshServer, true),
            RouteRule::new("delete-ratelimits", Method::POST, &p("/ratelimits/delete"), MeshServer, true),
            RouteRule::new("delete-circuitbreakers", Method::POST, &p("/circuitbreakers/delete"), MeshServer, true),
            RouteRule::new("unbind-circuitbreakers", Method::POST, &p("/circuitbreakers/unbind"), MeshServer, true),
            // Monitoring
            RouteRule::new(
                "monitor-query-range",
                Method::GET,
                &format!("{}/query_range", monitor),
                Monitor,
                false,
            ),
        ];

        Self::from_rules(rules)
    }

    /// Freeze a rule list into a table, rejecting duplicates.
    pub fn from_rules(rules: Vec<RouteRule>) -> Result<Self, RouteTableError> {
        for (i, a) in rules.iter().enumerate() {
            for b in &rules[i + 1..] {
                if a.method == b.method && a.pattern == b.pattern {
                    return Err(RouteTableError::DuplicateRule {
                        method: a.method.clone(),
                        pattern: format!("{:?}", a.pattern),
                    });
                }
            }
        }
        Ok(Self { rules })
    }

    /// Find the rule for a request, or None for a 404.
    ///
    /// Among all matching rules the one with the most literal segments wins,
    /// so `/{resource}/token` beats `/{resource}` regardless of declaration
    /// order.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteRule> {
        let segments = path_segments(path);
        self.rules
            .iter()
            .filter(|r| r.method == *method && r.pattern.matches(&segments))
            .max_by_key(|r| r.pattern.literal_count())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::rule::PathPattern;

    fn table() -> RouteTable {
        let web = WebConfig {
            request_url: "/naming/v1".to_string(),
            ..WebConfig::default()
        };
        RouteTable::build(&web).unwrap()
    }

    #[test]
    fn test_build_succeeds() {
        let t = table();
        assert!(!t.is_empty());
    }

    #[test]
    fn test_literal_route_lookup() {
        let t = table();
        let rule = t.lookup(&Method::POST, "/naming/v1/namespaces").unwrap();
        assert_eq!(rule.name, "create-namespaces");
        assert!(!rule.requires_auth);

        let rule = t.lookup(&Method::POST, "/naming/v1/instances").unwrap();
        assert_eq!(rule.name, "create-instances");
        assert!(rule.requires_auth);
    }

    #[test]
    fn test_specificity_token_beats_generic_resource() {
        let t = table();
        // Any resource value: the literal `token` suffix must win.
        for resource in ["services", "namespaces", "abc"] {
            let path = format!("/naming/v1/{}/token", resource);
            let rule = t.lookup(&Method::GET, &path).unwrap();
            assert_eq!(rule.name, "describe-token");
            assert!(rule.requires_auth);
        }
    }

    #[test]
    fn test_specificity_literal_suffixes() {
        let t = table();
        let rule = t.lookup(&Method::GET, "/naming/v1/services/aliases").unwrap();
        assert_eq!(rule.name, "describe-aliases");
        let rule = t.lookup(&Method::GET, "/naming/v1/services/count").unwrap();
        assert_eq!(rule.name, "describe-count");
        let rule = t.lookup(&Method::GET, "/naming/v1/services").unwrap();
        assert_eq!(rule.name, "describe-resource");
    }

    #[test]
    fn test_delete_routes_beat_nothing_else() {
        let t = table();
        let rule = t.lookup(&Method::POST, "/naming/v1/services/delete").unwrap();
        assert_eq!(rule.name, "delete-services");
        assert!(rule.requires_auth);
    }

    #[test]
    fn test_method_mismatch_is_not_found() {
        let t = table();
        assert!(t.lookup(&Method::DELETE, "/naming/v1/services").is_none());
        assert!(t.lookup(&Method::GET, "/log/search/elasticsearch").is_none());
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let t = table();
        assert!(t.lookup(&Method::GET, "/nope").is_none());
        assert!(t.lookup(&Method::GET, "/naming/v1/services/token/extra").is_none());
    }

    #[test]
    fn test_monitor_route() {
        let web = WebConfig {
            request_url: "/naming/v1".to_string(),
            monitor_url: "/monitor/v1".to_string(),
            ..WebConfig::default()
        };
        let t = RouteTable::build(&web).unwrap();
        let rule = t.lookup(&Method::GET, "/monitor/v1/query_range").unwrap();
        assert_eq!(rule.name, "monitor-query-range");
    }

    #[test]
    fn test_duplicate_rules_rejected() {
        let rules = vec![
            RouteRule::new("a", Method::GET, "/x/{resource}", crate::routing::rule::Target::MeshServer, false),
            RouteRule::new("b", Method::GET, "/x/{other}", crate::routing::rule::Target::MeshServer, true),
        ];
        // Same shape: both are one literal + one param.
        assert!(RouteTable::from_rules(rules).is_err());
        // Sanity: patterns with identical shapes compare equal.
        assert_eq!(PathPattern::parse("/x/{a}"), PathPattern::parse("/x/{b}"));
    }
}
