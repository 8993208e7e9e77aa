//! Proxy forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! ResolvedRequest + original body stream
//!     → forwarder.rs (rewrite path, filter headers, apply deadline)
//!     → shared hyper client (pooled connections per backend)
//!     → backend response
//!     → streamed back verbatim (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - The forwarder is a transparent pipe: backend error payloads reach the
//!   caller unchanged so the console UI can render them
//! - Large responses (log search, monitoring ranges) are never buffered
//! - Caller disconnect drops the outbound future, releasing the pooled
//!   connection promptly

pub mod forwarder;

pub use forwarder::{BackendTarget, ProxyForwarder};
