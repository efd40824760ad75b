//! Domain models for the gateway client.

pub mod amount;
pub mod order_status;
pub mod settings;

pub use amount::{Amount, DEFAULT_MIN_AMOUNT, from_minor_units, to_minor_units};
pub use order_status::OrderStatus;
pub use settings::{Environment, HttpMethod, Language};
