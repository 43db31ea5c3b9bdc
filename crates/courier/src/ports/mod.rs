//! Ports (Interfaces)
//!
//! Abstract interfaces that define how channels interact with
//! external systems (the HTTP transport and the notified recipient).
//!
//! Implementations of these traits live in adapter crates
//! (e.g., courier-http) or in application code.

pub mod notifiable;
pub mod transport;

// Re-exports
pub use notifiable::*;
pub use transport::*;
