//! Gateway transport: request building, timeout, hooks and logging.
//!
//! Wraps any [`Transport`] adapter. Parameters go out as a query string
//! (GET) or a form body (POST); responses are parsed as JSON.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tokio::time::Instant;
use tracing::{Level, debug, error, info, warn};
use url::form_urlencoded;
use vpos_types::redact::{create_safe_log_data, redact_object};
use vpos_types::{
    GatewayError, HttpMethod, RequestHooks, Transport, TransportFault, TransportRequest,
    TransportResponse, gateway_code,
};

use crate::config::{ClientConfig, LogConfig};

/// Gateway answer that passed the transport-level checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status_code: u16,
    pub data: Value,
    pub duration_ms: u64,
}

/// Sends parameter maps to gateway endpoints over a pluggable [`Transport`].
pub struct GatewayTransport<T: Transport> {
    transport: T,
    hooks: Option<Arc<dyn RequestHooks>>,
    method: HttpMethod,
    timeout: Duration,
    log: LogConfig,
}

impl<T: Transport> GatewayTransport<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            hooks: None,
            method: config.http_method,
            timeout: config.timeout,
            log: config.log,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RequestHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Performs one exchange with `{base_url}/{endpoint}`.
    ///
    /// Non-2xx statuses, network faults and timeouts are distinct failures;
    /// no retries are attempted.
    pub async fn request(
        &self,
        base_url: &str,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<GatewayResponse, GatewayError> {
        let request = build_request(self.method, &join_url(base_url, endpoint), params);

        let mut log_fields = identifier_fields(params);
        log_fields.insert("endpoint".into(), json!(endpoint));
        log_fields.insert("method".into(), json!(self.method.as_str()));
        self.log_event(Level::DEBUG, "gateway request started", &log_fields);

        if let Some(hooks) = &self.hooks {
            let redacted = redact_object(&Value::Object(hook_params(params)));
            self.run_hook(|| hooks.on_request(endpoint, &redacted));
        }

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.transport.send(request)).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log_fields.insert("durationMs".into(), json!(duration_ms));

        let response = match outcome {
            Ok(Ok(response)) => response,
            Err(_) | Ok(Err(TransportFault::Timeout)) => {
                self.log_event(Level::ERROR, "gateway request timed out", &log_fields);
                return Err(GatewayError::Timeout {
                    timeout_ms: self.timeout_ms(),
                });
            }
            Ok(Err(TransportFault::Other(source))) => {
                self.log_event(Level::ERROR, "gateway request failed", &log_fields);
                return Err(GatewayError::Transport {
                    status: None,
                    message: source.to_string(),
                    source: Some(source),
                });
            }
        };

        log_fields.insert("statusCode".into(), json!(response.status));
        self.interpret(endpoint, response, duration_ms, log_fields)
    }

    fn interpret(
        &self,
        endpoint: &str,
        response: TransportResponse,
        duration_ms: u64,
        mut log_fields: Map<String, Value>,
    ) -> Result<GatewayResponse, GatewayError> {
        if !response.is_success() {
            self.log_event(Level::WARN, "gateway returned non-success status", &log_fields);
            return Err(GatewayError::transport(
                Some(response.status),
                format!("gateway responded with HTTP {}", response.status),
            ));
        }

        let data: Value = serde_json::from_slice(&response.body).map_err(|e| {
            self.log_event(Level::ERROR, "gateway returned invalid JSON", &log_fields);
            GatewayError::Transport {
                status: Some(response.status),
                message: "gateway response is not valid JSON".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        if let Some(hooks) = &self.hooks {
            self.run_hook(|| hooks.on_response(endpoint, &data));
        }

        if let Ok(code) = gateway_code(&data) {
            log_fields.insert("errorCode".into(), json!(code));
        }
        self.log_event(Level::INFO, "gateway request completed", &log_fields);

        Ok(GatewayResponse {
            status_code: response.status,
            data,
            duration_ms,
        })
    }

    /// Hooks are observers: a panic inside one is logged and swallowed.
    fn run_hook(&self, hook: impl FnOnce()) {
        if catch_unwind(AssertUnwindSafe(hook)).is_err() {
            self.log_event(Level::WARN, "request hook panicked", &Map::new());
        }
    }

    fn log_event(&self, level: Level, message: &str, fields: &Map<String, Value>) {
        if !self.log.allows(level) {
            return;
        }
        let data = Value::Object(create_safe_log_data(fields));
        if level == Level::ERROR {
            error!(%data, "{message}");
        } else if level == Level::WARN {
            warn!(%data, "{message}");
        } else if level == Level::INFO {
            info!(%data, "{message}");
        } else {
            debug!(%data, "{message}");
        }
    }
}

/// Joins base address and path with exactly one slash between them.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn encode_params(params: &[(&str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

fn build_request(method: HttpMethod, url: &str, params: &[(&str, String)]) -> TransportRequest {
    let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
    let encoded = encode_params(params);

    match method {
        HttpMethod::Get => {
            let url = if encoded.is_empty() {
                url.to_string()
            } else {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{url}{separator}{encoded}")
            };
            TransportRequest {
                method,
                url,
                headers,
                body: None,
            }
        }
        HttpMethod::Post => {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
            TransportRequest {
                method,
                url: url.to_string(),
                headers,
                body: Some(encoded),
            }
        }
    }
}

/// Parameters as a JSON object for hooks. `jsonParams` is expanded so its
/// nested keys are redacted like top-level ones.
fn hook_params(params: &[(&str, String)]) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| {
            let value = match *k {
                "jsonParams" => {
                    serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.clone()))
                }
                _ => Value::String(v.clone()),
            };
            ((*k).to_string(), value)
        })
        .collect()
}

/// Identifier parameters worth logging (they are masked by the safe-log builder).
fn identifier_fields(params: &[(&str, String)]) -> Map<String, Value> {
    params
        .iter()
        .filter(|(k, _)| matches!(*k, "orderId" | "orderNumber"))
        .map(|(k, v)| ((*k).to_string(), Value::String(v.clone())))
        .collect()
}
