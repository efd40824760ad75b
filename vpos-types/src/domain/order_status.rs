//! Order lifecycle status as reported by the gateway.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an order on the gateway side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum OrderStatus {
    /// Order registered, not paid yet
    Registered,
    /// Amount is held on the card (two-stage payments)
    PreAuthorized,
    /// Amount is charged
    Deposited,
    /// Authorization cancelled
    Reversed,
    Refunded,
    /// Waiting for the card issuer's ACS
    AuthorizationInitiated,
    Declined,
    /// A value the gateway documents elsewhere or added later
    Unknown(i64),
}

impl OrderStatus {
    pub fn code(&self) -> i64 {
        match self {
            OrderStatus::Registered => 0,
            OrderStatus::PreAuthorized => 1,
            OrderStatus::Deposited => 2,
            OrderStatus::Reversed => 3,
            OrderStatus::Refunded => 4,
            OrderStatus::AuthorizationInitiated => 5,
            OrderStatus::Declined => 6,
            OrderStatus::Unknown(code) => *code,
        }
    }
}

impl From<i64> for OrderStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => OrderStatus::Registered,
            1 => OrderStatus::PreAuthorized,
            2 => OrderStatus::Deposited,
            3 => OrderStatus::Reversed,
            4 => OrderStatus::Refunded,
            5 => OrderStatus::AuthorizationInitiated,
            6 => OrderStatus::Declined,
            other => OrderStatus::Unknown(other),
        }
    }
}

impl From<OrderStatus> for i64 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Registered => write!(f, "REGISTERED"),
            OrderStatus::PreAuthorized => write!(f, "PRE_AUTHORIZED"),
            OrderStatus::Deposited => write!(f, "DEPOSITED"),
            OrderStatus::Reversed => write!(f, "REVERSED"),
            OrderStatus::Refunded => write!(f, "REFUNDED"),
            OrderStatus::AuthorizationInitiated => write!(f, "AUTHORIZATION_INITIATED"),
            OrderStatus::Declined => write!(f, "DECLINED"),
            OrderStatus::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}
