//! Gateway error code descriptions.
//!
//! Each operation has its own code table. Zero always means success.

use crate::error::Operation;

const REGISTER_CODES: &[(i64, &str)] = &[
    (0, "No system error"),
    (1, "Order with this number is already registered"),
    (3, "Unknown currency"),
    (4, "Required request parameter is missing"),
    (5, "Invalid value of a request parameter"),
    (7, "System error"),
    (14, "Payment method is disabled for this terminal"),
];

const CONFIRM_CODES: &[(i64, &str)] = &[
    (0, "No system error"),
    (2, "Order declined because of an error in the card payment credentials"),
    (5, "Access denied"),
    (6, "Unregistered order Id"),
    (7, "System error"),
];

const REFUND_CODES: &[(i64, &str)] = &[
    (0, "No system error"),
    (5, "Access denied or invalid refund amount"),
    (6, "Unregistered order Id"),
    (7, "System error or payment is in an incorrect state"),
];

fn table(operation: Operation) -> &'static [(i64, &'static str)] {
    match operation {
        Operation::Register => REGISTER_CODES,
        Operation::Confirm => CONFIRM_CODES,
        Operation::Refund => REFUND_CODES,
    }
}

/// Looks up the fixed description of `code` for `operation`.
pub fn lookup(operation: Operation, code: i64) -> Option<&'static str> {
    table(operation)
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// Human-readable description of a gateway code.
///
/// Never fails: unknown codes resolve to `"unknown error code N"`.
pub fn describe(operation: Operation, code: i64) -> String {
    lookup(operation, code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("unknown error code {code}"))
}
