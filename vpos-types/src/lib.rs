//! # vPOS Types
//!
//! Domain types and port traits for the vPOS payment gateway client.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, redaction and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the client:
//! - `domain/` - Pure domain types (Amount, OrderStatus, Language)
//! - `ports/` - Trait definitions that transport adapters must implement
//! - `dto/` - Request and result shapes of the three gateway operations
//! - `error/` - The single failure type every operation returns
//! - `error_codes/` - Gateway code descriptions per operation
//! - `redact/` - Safe-to-log views of parameters, payloads and URLs

pub mod domain;
pub mod dto;
pub mod error;
pub mod error_codes;
pub mod ports;
pub mod redact;

// Re-export commonly used types
pub use domain::{
    Amount, DEFAULT_MIN_AMOUNT, Environment, HttpMethod, Language, OrderStatus,
    from_minor_units, to_minor_units,
};
pub use dto::*;
pub use error::{GatewayError, Operation, ValidationCode};
pub use error_codes::describe;
pub use ports::{RequestHooks, Transport, TransportFault, TransportRequest, TransportResponse};
