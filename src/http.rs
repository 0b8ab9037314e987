use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Timeout applied by the default HTTP client
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP method used by the device API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

/// Status code and raw body of a device response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Capability to issue one JSON request against the device REST API
///
/// Implementations report any status code as a successful response. Only
/// failures to complete the exchange are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse>;
}

/// `reqwest` backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default request timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        let builder = match body {
            Some(json) => builder.header(CONTENT_TYPE, "application/json").json(&json),
            None => builder,
        };

        // url embeds the auth token, keep it out of logs
        tracing::debug!("Sending {:?} request", method);
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
