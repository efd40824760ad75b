//! Error types for the gateway client.

use std::fmt;

use serde_json::Value;

use crate::error_codes::describe;

/// The gateway operation a failure belongs to.
///
/// Gateway codes are not a universal code space: code 6 from `confirm`
/// means something different from code 6 from `refund`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Confirm,
    Refund,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Confirm => "confirm",
            Operation::Refund => "refund",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason for a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// A mandatory field is missing or blank.
    Required,
    /// A field exceeds its documented length.
    TooLong,
    /// A value does not match its expected format.
    InvalidFormat,
    NegativeAmount,
    BelowMinimum,
    TooManyDecimals,
    /// An operation that needs an amount was called without one.
    AmountRequired,
    /// The serialized extra parameters exceed the gateway's byte budget.
    PayloadTooLarge,
    InvalidMinorUnits,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::Required => "REQUIRED",
            ValidationCode::TooLong => "TOO_LONG",
            ValidationCode::InvalidFormat => "INVALID_FORMAT",
            ValidationCode::NegativeAmount => "NEGATIVE_AMOUNT",
            ValidationCode::BelowMinimum => "BELOW_MINIMUM",
            ValidationCode::TooManyDecimals => "TOO_MANY_DECIMALS",
            ValidationCode::AmountRequired => "AMOUNT_REQUIRED",
            ValidationCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ValidationCode::InvalidMinorUnits => "INVALID_MINOR_UNITS",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure the client can report.
///
/// Callers branch on the variant; none of them is ever downgraded to a
/// successful result.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Missing configuration: {}", missing.join(", "))]
    Config { missing: Vec<String> },

    #[error("Validation error [{code}]: {message}")]
    Validation {
        code: ValidationCode,
        message: String,
        details: Value,
    },

    #[error("Transport error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Gateway rejected {operation} with code {code}: {description}")]
    Api {
        operation: Operation,
        code: i64,
        description: String,
        /// Message text the gateway sent along with the code, if any.
        message: Option<String>,
        order_id: Option<String>,
    },
}

impl GatewayError {
    pub fn validation(code: ValidationCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn validation_with(code: ValidationCode, message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details,
        }
    }

    /// Builds a gateway API failure, resolving the description from the
    /// per-operation code table.
    pub fn api(
        operation: Operation,
        code: i64,
        message: Option<String>,
        order_id: Option<String>,
    ) -> Self {
        Self::Api {
            operation,
            code,
            description: describe(operation, code),
            message,
            order_id,
        }
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the validation sub-code, if this is a validation failure.
    pub fn validation_code(&self) -> Option<ValidationCode> {
        match self {
            Self::Validation { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_every_missing_key() {
        let err = GatewayError::Config {
            missing: vec!["VPOS_LOGIN".into(), "VPOS_SECRET".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing configuration: VPOS_LOGIN, VPOS_SECRET"
        );
    }

    #[test]
    fn test_api_error_resolves_description() {
        let err = GatewayError::api(Operation::Confirm, 6, None, None);
        match err {
            GatewayError::Api {
                operation,
                code,
                description,
                ..
            } => {
                assert_eq!(operation, Operation::Confirm);
                assert_eq!(code, 6);
                assert_eq!(description, "Unregistered order Id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transport_display_includes_status() {
        let err = GatewayError::transport(Some(502), "bad gateway");
        assert_eq!(err.to_string(), "Transport error (HTTP 502): bad gateway");

        let err = GatewayError::transport(None, "connection reset");
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn test_validation_code_accessor() {
        let err = GatewayError::validation(ValidationCode::TooLong, "orderNumber too long");
        assert_eq!(err.validation_code(), Some(ValidationCode::TooLong));
        assert!(!err.is_timeout());
        assert!(GatewayError::Timeout { timeout_ms: 10 }.is_timeout());
    }
}
