//! Transport port trait.
//!
//! The narrow "send a request, get a response" capability. Production code
//! implements it over a real HTTP stack, tests over an in-memory stub.

use std::sync::Arc;

use crate::domain::HttpMethod;

/// A fully built HTTP request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Absolute URL, including the query string in GET mode
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form-encoded body in POST mode
    pub body: Option<String>,
}

impl TransportRequest {
    /// Returns the first header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response: status and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a transport could not produce a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportFault {
    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// The network port used by the gateway client.
///
/// Implementations must not apply retries; the caller owns that policy.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFault>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFault> {
        (**self).send(request).await
    }
}
