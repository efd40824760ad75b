//! Port traits (interfaces for adapters).
//!
//! These are the contracts that network adapters must implement.
//! The client depends on these traits, not on a concrete HTTP stack.

mod hooks;
mod transport;

pub use hooks::RequestHooks;
pub use transport::{Transport, TransportFault, TransportRequest, TransportResponse};
