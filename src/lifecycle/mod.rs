//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build table/guard/forwarder → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → stop accepting → drain in-flight → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
