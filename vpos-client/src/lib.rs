//! # vPOS Client
//!
//! A typed Rust client for the vPOS payment gateway REST API.
//!
//! ## Architecture
//!
//! - `config/` - Client configuration and environment loading
//! - `transport/` - Gateway exchange: encoding, timeout, hooks, redacted logging
//! - `http/` - Production transport adapter over `reqwest`
//! - `client/` - The register / confirm / refund operations
//!
//! The client is generic over `T: Transport`, so the network layer can be
//! replaced by an in-memory stub in tests.

pub mod client;
pub mod config;
pub mod http;
pub mod transport;


pub use client::{CONFIRM_ENDPOINT, GatewayClient, REFUND_ENDPOINT, REGISTER_ENDPOINT};
pub use config::{ClientConfig, LogConfig};
pub use http::ReqwestTransport;
pub use transport::{GatewayResponse, GatewayTransport};
pub use vpos_types::*;
