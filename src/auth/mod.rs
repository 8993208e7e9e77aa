//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Gated request (rule.requires_auth == true)
//!     → guard.rs reads X-Staff-Name + X-OA-Token (or oa-token cookie)
//!     → signature + expiry check against the configured secret
//!     → operator-list check for the principal
//!     → AuthDecision { principal, allowed }
//! ```
//!
//! # Design Decisions
//! - Decision computed at most once per request, never cached across them
//! - The raw assertion is never part of any response
//! - Exempt routes bypass the guard entirely; gating lives in the route table

pub mod guard;

pub use guard::{AuthDecision, AuthGuard, OA_TOKEN_COOKIE, X_OA_TOKEN, X_STAFF_NAME};
