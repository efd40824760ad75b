//! Merchant amounts and their minor-unit wire representation.
//!
//! Conversion to minor units is done on the decimal text (or on exact
//! integers), never with binary floating-point arithmetic.

use std::fmt;

use num_bigint::{BigInt, Sign};
use rust_decimal::Decimal;
use serde_json::json;

use crate::error::{GatewayError, ValidationCode};

/// Smallest amount the gateway accepts, in major units.
pub const DEFAULT_MIN_AMOUNT: u64 = 50;

const MAX_FRACTION_DIGITS: usize = 2;

/// A merchant-facing amount in major units (e.g. `5000` or `"806.50"`).
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    /// Decimal text such as `"806.5"`.
    Text(String),
    /// A native float, converted through its shortest decimal text.
    ///
    /// Float noise is rejected, not rounded: `0.1 + 0.2` prints as
    /// `0.30000000000000004` and fails with `TooManyDecimals`.
    Number(f64),
    Decimal(Decimal),
    /// Whole major units of unbounded size.
    Integer(BigInt),
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::Decimal(value)
    }
}

impl From<BigInt> for Amount {
    fn from(value: BigInt) -> Self {
        Amount::Integer(value)
    }
}

macro_rules! amount_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Amount {
                fn from(value: $ty) -> Self {
                    Amount::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

amount_from_int!(i32, i64, u32, u64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Text(text) => f.write_str(text),
            Amount::Number(n) => write!(f, "{n}"),
            Amount::Decimal(d) => write!(f, "{d}"),
            Amount::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Converts a major-unit amount into the gateway's minor-unit string.
///
/// The result has no leading zeros (except the literal `"0"`).
pub fn to_minor_units(amount: &Amount, minimum: u64) -> Result<String, GatewayError> {
    match amount {
        Amount::Integer(value) => integer_to_minor(value, minimum),
        Amount::Text(text) => decimal_text_to_minor(text, minimum),
        Amount::Number(value) => decimal_text_to_minor(&value.to_string(), minimum),
        Amount::Decimal(value) => decimal_text_to_minor(&value.normalize().to_string(), minimum),
    }
}

/// Converts a minor-unit integer (number or numeric text) back to major units.
///
/// The result is exact up to `Decimal`'s 96-bit mantissa (about 7.9e28
/// minor units); larger values are a validation failure.
pub fn from_minor_units(minor: impl fmt::Display) -> Result<Decimal, GatewayError> {
    let text = minor.to_string();
    let invalid = |reason: &str| {
        GatewayError::validation_with(
            ValidationCode::InvalidMinorUnits,
            format!("'{text}' {reason}"),
            json!({ "value": text }),
        )
    };
    let value: i128 = text
        .trim()
        .parse()
        .map_err(|_| invalid("is not an integer amount in minor units"))?;
    Decimal::try_from_i128_with_scale(value, 2)
        .map_err(|_| invalid("exceeds the largest representable amount"))
}

fn integer_to_minor(value: &BigInt, minimum: u64) -> Result<String, GatewayError> {
    if value.sign() == Sign::Minus {
        return Err(negative(&value.to_string()));
    }
    if *value < BigInt::from(minimum) {
        return Err(below_minimum(&value.to_string(), minimum));
    }
    Ok((value * 100u32).to_string())
}

fn decimal_text_to_minor(text: &str, minimum: u64) -> Result<String, GatewayError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::validation(
            ValidationCode::Required,
            "Amount cannot be empty",
        ));
    }

    let (is_negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return Err(GatewayError::validation_with(
            ValidationCode::InvalidFormat,
            format!("'{trimmed}' is not a decimal amount"),
            json!({ "amount": trimmed }),
        ));
    }

    let is_zero = unsigned.bytes().all(|b| b == b'0' || b == b'.');
    if is_negative && !is_zero {
        return Err(negative(trimmed));
    }

    if is_below_minimum(int_part, minimum) {
        return Err(below_minimum(trimmed, minimum));
    }

    let frac_part = frac_part.unwrap_or("");
    if frac_part.len() > MAX_FRACTION_DIGITS {
        return Err(GatewayError::validation_with(
            ValidationCode::TooManyDecimals,
            format!("Amount '{trimmed}' has more than {MAX_FRACTION_DIGITS} decimal places"),
            json!({ "amount": trimmed, "max_decimals": MAX_FRACTION_DIGITS }),
        ));
    }

    let mut minor = String::with_capacity(int_part.len() + MAX_FRACTION_DIGITS);
    minor.push_str(int_part);
    minor.push_str(frac_part);
    for _ in frac_part.len()..MAX_FRACTION_DIGITS {
        minor.push('0');
    }

    let minor = minor.trim_start_matches('0');
    Ok(if minor.is_empty() {
        "0".to_string()
    } else {
        minor.to_string()
    })
}

/// Compares the integer digits against `minimum` without parsing them,
/// so arbitrarily long inputs never overflow.
fn is_below_minimum(int_digits: &str, minimum: u64) -> bool {
    if minimum == 0 {
        return false;
    }
    let digits = int_digits.trim_start_matches('0');
    let minimum = minimum.to_string();
    if digits.len() != minimum.len() {
        return digits.len() < minimum.len();
    }
    digits < minimum.as_str()
}

fn negative(amount: &str) -> GatewayError {
    GatewayError::validation_with(
        ValidationCode::NegativeAmount,
        "Amount cannot be negative",
        json!({ "amount": amount }),
    )
}

fn below_minimum(amount: &str, minimum: u64) -> GatewayError {
    GatewayError::validation_with(
        ValidationCode::BelowMinimum,
        format!("Amount {amount} is below the minimum of {minimum}"),
        json!({ "amount": amount, "minimum": minimum }),
    )
}
