//! Production [`Transport`] over `reqwest`.

use reqwest::Client;
use vpos_types::{HttpMethod, Transport, TransportFault, TransportRequest, TransportResponse};

/// HTTP transport backed by a pooled `reqwest::Client`.
///
/// Timeouts are enforced by the gateway transport around this adapter, so
/// the default client carries none of its own.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Uses a preconfigured client (e.g. with a proxy or custom TLS roots).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFault> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(into_fault)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(into_fault)?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

fn into_fault(err: reqwest::Error) -> TransportFault {
    if err.is_timeout() {
        TransportFault::Timeout
    } else {
        TransportFault::Other(Box::new(err))
    }
}
