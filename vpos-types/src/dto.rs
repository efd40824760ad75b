//! Request and result shapes of the gateway operations.
//!
//! Every result keeps the gateway payload verbatim in `raw`, next to the
//! normalized fields.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{Amount, OrderStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Register
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new order and obtain a payment page URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterOrderRequest {
    /// Merchant order number (max 10 characters)
    pub order_number: String,
    /// Amount in major units
    pub amount: Amount,
    pub return_url: String,
    /// Falls back to `return_url` when not set
    pub fail_url: Option<String>,
    /// Reference fields; the first one is mandatory, at most five
    pub reference_ids: Vec<String>,
    /// Optional order description (max 512 characters)
    pub description: Option<String>,
    pub funding_type_indicator: Option<String>,
    /// Forwarded so the gateway can deduplicate retried registrations
    pub idempotency_key: Option<String>,
    /// Free-form fields merged into the serialized extra parameters
    pub additional_params: Map<String, Value>,
}

impl RegisterOrderRequest {
    pub fn new(
        order_number: impl Into<String>,
        amount: impl Into<Amount>,
        return_url: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            amount: amount.into(),
            return_url: return_url.into(),
            fail_url: None,
            reference_ids: vec![reference_id.into()],
            description: None,
            funding_type_indicator: None,
            idempotency_key: None,
            additional_params: Map::new(),
        }
    }

    pub fn with_fail_url(mut self, fail_url: impl Into<String>) -> Self {
        self.fail_url = Some(fail_url.into());
        self
    }

    /// Appends one more reference field.
    pub fn with_reference_id(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_ids.push(reference_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_funding_type_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.funding_type_indicator = Some(indicator.into());
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_params.insert(name.into(), value.into());
        self
    }
}

/// Result of a successful registration round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterOrderResponse {
    /// Gateway-assigned order identifier
    pub order_id: Option<String>,
    /// Hosted payment page the customer is redirected to
    pub form_url: Option<String>,
    pub error_code: i64,
    pub raw: Value,
}

impl RegisterOrderResponse {
    pub fn from_payload(raw: Value) -> Self {
        Self {
            order_id: string_field(&raw, &["orderId"]),
            form_url: string_field(&raw, &["formUrl"]),
            error_code: gateway_code(&raw).unwrap_or_default(),
            raw,
        }
    }

    /// Zero code and both an order id and a payment page URL present.
    pub fn succeeded(&self) -> bool {
        self.error_code == 0
            && self.order_id.as_deref().is_some_and(|id| !id.is_empty())
            && self.form_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirm
// ─────────────────────────────────────────────────────────────────────────────

/// Order state reported by the gateway's status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmOrderResponse {
    pub error_code: i64,
    pub error_message: Option<String>,
    pub order_status: Option<OrderStatus>,
    pub order_number: Option<String>,
    /// Amount in minor units
    pub amount: Option<i64>,
    /// Masked card number
    pub pan: Option<String>,
    pub cardholder_name: Option<String>,
    pub approval_code: Option<String>,
    /// Authorization reference number
    pub auth_ref_num: Option<String>,
    pub currency: Option<String>,
    pub description: Option<String>,
    /// Client IP address seen by the gateway
    pub ip: Option<String>,
    pub extra_params: BTreeMap<String, String>,
    pub raw: Value,
}

impl ConfirmOrderResponse {
    pub fn from_payload(raw: Value) -> Self {
        Self {
            error_code: gateway_code(&raw).unwrap_or_default(),
            error_message: string_field(&raw, &["ErrorMessage", "errorMessage"]),
            order_status: int_field(&raw, &["OrderStatus", "orderStatus"]).map(OrderStatus::from),
            order_number: string_field(&raw, &["OrderNumber", "orderNumber"]),
            amount: int_field(&raw, &["Amount", "amount"]),
            pan: string_field(&raw, &["Pan", "pan"]),
            cardholder_name: string_field(&raw, &["cardholderName", "CardholderName"]),
            approval_code: string_field(&raw, &["approvalCode", "ApprovalCode"]),
            auth_ref_num: string_field(&raw, &["authRefNum", "AuthRefNum"]),
            currency: string_field(&raw, &["currency", "Currency"]),
            description: string_field(&raw, &["OrderDescription", "orderDescription"]),
            ip: string_field(&raw, &["Ip", "ip"]),
            extra_params: extra_params(&raw),
            raw,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error_code == 0
    }

    /// Succeeded and the order is deposited.
    pub fn is_paid(&self) -> bool {
        self.succeeded() && self.order_status == Some(OrderStatus::Deposited)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Refund
// ─────────────────────────────────────────────────────────────────────────────

/// Request to refund (part of) a deposited order.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    /// Gateway-assigned order identifier
    pub order_id: String,
    /// Amount in major units; required by the operation
    pub amount: Option<Amount>,
}

impl RefundRequest {
    pub fn new(order_id: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            order_id: order_id.into(),
            amount: Some(amount.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundResponse {
    pub error_code: i64,
    pub error_message: Option<String>,
    pub raw: Value,
}

impl RefundResponse {
    pub fn from_payload(raw: Value) -> Self {
        Self {
            error_code: gateway_code(&raw).unwrap_or_default(),
            error_message: string_field(&raw, &["errorMessage", "ErrorMessage"]),
            raw,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error_code == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload readers
// ─────────────────────────────────────────────────────────────────────────────

/// Reads the operation code under either casing of the key.
///
/// A missing code means success. `Err` carries the unparseable value.
pub fn gateway_code(raw: &Value) -> Result<i64, Value> {
    match field(raw, &["errorCode", "ErrorCode"]) {
        None => Ok(0),
        Some(value) => lenient_i64(value).ok_or_else(|| value.clone()),
    }
}

/// Reads the gateway's message text under either casing of the key.
pub fn gateway_message(raw: &Value) -> Option<String> {
    string_field(raw, &["errorMessage", "ErrorMessage"])
}

fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// Accepts both native numbers and their string representation.
fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn int_field(raw: &Value, keys: &[&str]) -> Option<i64> {
    field(raw, keys).and_then(lenient_i64)
}

fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    field(raw, keys).and_then(lenient_string)
}

/// Folds `merchantOrderParams` (`[{name, value}]`) and `extraParams`
/// (`{name: value}`) into one mapping.
fn extra_params(raw: &Value) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    if let Some(Value::Array(items)) = raw.get("merchantOrderParams") {
        for item in items {
            let name = item.get("name").and_then(lenient_string);
            let value = item.get("value").and_then(lenient_string);
            if let (Some(name), Some(value)) = (name, value) {
                params.insert(name, value);
            }
        }
    }

    if let Some(Value::Object(map)) = raw.get("extraParams") {
        for (name, value) in map {
            if let Some(value) = lenient_string(value) {
                params.insert(name.clone(), value);
            }
        }
    }

    params
}
