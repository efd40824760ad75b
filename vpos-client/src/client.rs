//! Gateway client: register, confirm and refund.
//!
//! Each operation is a straight validate → transform → call → interpret
//! pipeline. Validation failures are raised before any network call.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use vpos_types::{
    ConfirmOrderResponse, GatewayError, Operation, RefundRequest, RefundResponse,
    RegisterOrderRequest, RegisterOrderResponse, RequestHooks, Transport, ValidationCode,
    gateway_code, gateway_message, to_minor_units,
};

use crate::config::ClientConfig;
use crate::http::ReqwestTransport;
use crate::transport::{GatewayResponse, GatewayTransport};

pub const REGISTER_ENDPOINT: &str = "payment/rest/register.do";
pub const CONFIRM_ENDPOINT: &str = "payment/rest/getOrderStatus.do";
pub const REFUND_ENDPOINT: &str = "payment/rest/refund.do";

pub const ORDER_NUMBER_MAX_LEN: usize = 10;
pub const REFERENCE_ID_MAX_LEN: usize = 20;
pub const MAX_REFERENCE_IDS: usize = 5;
pub const DESCRIPTION_MAX_LEN: usize = 512;
/// Byte budget of the serialized `jsonParams` field.
pub const JSON_PARAMS_MAX_BYTES: usize = 1024;

/// Typed client for the vPOS gateway.
///
/// Generic over `T: Transport` - the network adapter is injected at
/// construction. The configuration is read-only, so a client can be
/// shared freely between concurrent callers.
pub struct GatewayClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: GatewayTransport<T>,
}

impl GatewayClient<ReqwestTransport> {
    /// Creates a client that talks to the gateway over `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Creates a client from `VPOS_*` environment variables.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> GatewayClient<T> {
    /// Creates a client over a custom transport (tests, proxies, mocks).
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, GatewayError> {
        config.validate()?;
        let transport = GatewayTransport::new(transport, &config);
        Ok(Self { config, transport })
    }

    /// Installs request/response observers.
    pub fn with_hooks(mut self, hooks: Arc<dyn RequestHooks>) -> Self {
        self.transport = self.transport.with_hooks(hooks);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying network adapter.
    pub fn transport(&self) -> &T {
        self.transport.transport()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers an order and returns the payment page to redirect to.
    pub async fn register(
        &self,
        req: &RegisterOrderRequest,
    ) -> Result<RegisterOrderResponse, GatewayError> {
        validate_register(req)?;
        let json_params = self.build_json_params(req)?;
        let amount = to_minor_units(&req.amount, self.config.min_amount)?;

        let mut params = self.credentials();
        params.extend([
            ("orderNumber", req.order_number.clone()),
            ("amount", amount),
            ("currency", self.config.currency.clone()),
            ("returnUrl", req.return_url.clone()),
            (
                "failUrl",
                req.fail_url.clone().unwrap_or_else(|| req.return_url.clone()),
            ),
            ("language", self.config.language.to_string()),
            ("jsonParams", json_params),
        ]);
        if let Some(description) = &req.description {
            params.push(("description", description.clone()));
        }
        if let Some(indicator) = &req.funding_type_indicator {
            params.push(("fundingTypeIndicator", indicator.clone()));
        }
        if let Some(key) = &req.idempotency_key {
            params.push(("idempotencyKey", key.clone()));
        }

        let response = self
            .transport
            .request(&self.config.base_url, REGISTER_ENDPOINT, &params)
            .await?;

        let order_id = response
            .data
            .get("orderId")
            .and_then(Value::as_str)
            .map(str::to_string);
        check_code(Operation::Register, &response, order_id)?;

        Ok(RegisterOrderResponse::from_payload(response.data))
    }

    /// Fetches the current state of an order.
    pub async fn confirm(&self, order_id: &str) -> Result<ConfirmOrderResponse, GatewayError> {
        require_order_id(order_id)?;

        let mut params = self.credentials();
        params.extend([
            ("orderId", order_id.to_string()),
            ("language", self.config.language.to_string()),
        ]);

        let response = self
            .transport
            .request(&self.config.base_url, CONFIRM_ENDPOINT, &params)
            .await?;
        check_code(Operation::Confirm, &response, Some(order_id.to_string()))?;

        Ok(ConfirmOrderResponse::from_payload(response.data))
    }

    /// Refunds `amount` (major units) of a deposited order.
    pub async fn refund(&self, req: &RefundRequest) -> Result<RefundResponse, GatewayError> {
        require_order_id(&req.order_id)?;
        let amount = req.amount.as_ref().ok_or_else(|| {
            GatewayError::validation(ValidationCode::AmountRequired, "Refund amount is required")
        })?;
        let amount = to_minor_units(amount, self.config.min_amount)?;

        let mut params = self.credentials();
        params.extend([
            ("orderId", req.order_id.clone()),
            ("amount", amount),
            ("currency", self.config.currency.clone()),
            ("language", self.config.language.to_string()),
        ]);

        let response = self
            .transport
            .request(&self.config.base_url, REFUND_ENDPOINT, &params)
            .await?;
        check_code(Operation::Refund, &response, Some(req.order_id.clone()))?;

        Ok(RefundResponse::from_payload(response.data))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────────

    fn credentials(&self) -> Vec<(&'static str, String)> {
        vec![
            ("userName", self.config.login.clone()),
            ("password", self.config.secret.clone()),
        ]
    }

    /// Serializes the nested `jsonParams` payload and enforces its byte budget.
    fn build_json_params(&self, req: &RegisterOrderRequest) -> Result<String, GatewayError> {
        let mut map = Map::new();
        map.insert("terminalId".into(), json!(self.config.terminal_id));
        for (idx, reference_id) in req.reference_ids.iter().enumerate() {
            if !reference_id.is_empty() {
                map.insert(format!("refId{}", idx + 1), json!(reference_id));
            }
        }
        if let Some(indicator) = &req.funding_type_indicator {
            map.insert("fundingTypeIndicator".into(), json!(indicator));
        }
        for (name, value) in &req.additional_params {
            map.entry(name.clone()).or_insert_with(|| value.clone());
        }

        let serialized = Value::Object(map).to_string();
        if serialized.len() > JSON_PARAMS_MAX_BYTES {
            return Err(GatewayError::validation_with(
                ValidationCode::PayloadTooLarge,
                format!(
                    "jsonParams is {} bytes, the limit is {JSON_PARAMS_MAX_BYTES}",
                    serialized.len()
                ),
                json!({ "field": "jsonParams", "bytes": serialized.len(), "max": JSON_PARAMS_MAX_BYTES }),
            ));
        }
        Ok(serialized)
    }
}

/// Fails with an API error when the gateway reports a non-zero code.
fn check_code(
    operation: Operation,
    response: &GatewayResponse,
    order_id: Option<String>,
) -> Result<(), GatewayError> {
    let code = gateway_code(&response.data).map_err(|value| {
        GatewayError::transport(
            Some(response.status_code),
            format!("gateway returned an unreadable error code: {value}"),
        )
    })?;

    if code != 0 {
        return Err(GatewayError::api(
            operation,
            code,
            gateway_message(&response.data),
            order_id,
        ));
    }
    Ok(())
}

fn validate_register(req: &RegisterOrderRequest) -> Result<(), GatewayError> {
    require("orderNumber", &req.order_number)?;
    max_len("orderNumber", &req.order_number, ORDER_NUMBER_MAX_LEN)?;
    require("returnUrl", &req.return_url)?;

    match req.reference_ids.first() {
        Some(first) => require("refId1", first)?,
        None => {
            return Err(GatewayError::validation_with(
                ValidationCode::Required,
                "refId1 is required",
                json!({ "field": "refId1" }),
            ));
        }
    }
    if req.reference_ids.len() > MAX_REFERENCE_IDS {
        return Err(GatewayError::validation_with(
            ValidationCode::TooLong,
            format!("At most {MAX_REFERENCE_IDS} reference fields are allowed"),
            json!({ "field": "referenceIds", "count": req.reference_ids.len(), "max": MAX_REFERENCE_IDS }),
        ));
    }
    for (idx, reference_id) in req.reference_ids.iter().enumerate() {
        max_len(&format!("refId{}", idx + 1), reference_id, REFERENCE_ID_MAX_LEN)?;
    }

    if let Some(description) = &req.description {
        max_len("description", description, DESCRIPTION_MAX_LEN)?;
    }
    Ok(())
}

fn require_order_id(order_id: &str) -> Result<(), GatewayError> {
    require("orderId", order_id)
}

fn require(field: &str, value: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::validation_with(
            ValidationCode::Required,
            format!("{field} is required"),
            json!({ "field": field }),
        ));
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), GatewayError> {
    let len = value.chars().count();
    if len > max {
        return Err(GatewayError::validation_with(
            ValidationCode::TooLong,
            format!("{field} must be at most {max} characters, got {len}"),
            json!({ "field": field, "length": len, "max": max }),
        ));
    }
    Ok(())
}
