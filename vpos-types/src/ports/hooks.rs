//! Observability hooks around each gateway exchange.

use serde_json::Value;

/// Callbacks invoked around every gateway call.
///
/// `on_request` receives the already-redacted parameters, `on_response`
/// the raw parsed payload. Hooks run synchronously and cannot alter or
/// fail the call.
pub trait RequestHooks: Send + Sync {
    fn on_request(&self, _endpoint: &str, _params: &Value) {}

    fn on_response(&self, _endpoint: &str, _response: &Value) {}
}
