//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch state machine)
//!     → request.rs (attach request ID)
//!     → routing layer matches a rule
//!     → auth guard gates mutation endpoints
//!     → proxy forwarder relays to the backend
//!     → Response streamed to client
//! ```

pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerInitError};
