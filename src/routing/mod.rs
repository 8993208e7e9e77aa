//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → table.rs (rule lookup, longest-literal-prefix wins)
//!     → resource.rs (extract + validate {resource} placeholder)
//!     → Return: ResolvedRequest or NotFound / InvalidResource
//!
//! Table construction (at startup):
//!     WebConfig prefixes
//!     → Declare rules with concrete patterns
//!     → Reject duplicate (method, pattern) pairs
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Table built once at startup, immutable at runtime
//! - Specificity (literal beats placeholder) is a tested contract, never
//!   an artifact of declaration order
//! - Resource kinds are a closed allow-list

pub mod resource;
pub mod rule;
pub mod table;

pub use resource::{resolve, ResolvedRequest, ResourceKind};
pub use rule::{PathPattern, RouteRule, Target};
pub use table::RouteTable;
