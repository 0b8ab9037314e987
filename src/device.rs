use crate::error::Result;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::stream::NanoStream;
use crate::types::Endpoint;
use std::fmt;
use std::sync::Arc;

/// Handle to one Nanoleaf device
///
/// Holds the base URL of the device API and the auth token obtained by
/// pairing. Cloning is cheap and shares the HTTP transport.
#[derive(Clone)]
pub struct Nanoleaf {
    url: String,
    token: String,
    http: Arc<dyn HttpTransport>,
}

impl Nanoleaf {
    /// Create an unauthenticated handle using the default HTTP client
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_token(url, String::new())
    }

    /// Create a handle with a known auth token
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Arc::new(ReqwestTransport::new()?);
        Ok(Self::with_transport(url, token, http))
    }

    /// Create a handle on top of a custom HTTP transport
    pub fn with_transport(
        url: impl Into<String>,
        token: impl Into<String>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            http,
        }
    }

    /// Create an unauthenticated handle for a discovered endpoint
    pub fn from_endpoint(endpoint: &Endpoint, http: Arc<dyn HttpTransport>) -> Self {
        Self::with_transport(endpoint.url(), String::new(), http)
    }

    /// Base URL of the device API
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Replace the auth token, e.g. after re-pairing
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    pub(crate) fn http(&self) -> &Arc<dyn HttpTransport> {
        &self.http
    }

    /// Create an inert streaming session bound to this device
    pub fn stream(&self) -> NanoStream {
        NanoStream::new(self.clone())
    }
}

impl fmt::Debug for Nanoleaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nanoleaf")
            .field("url", &self.url)
            .field("authorized", &!self.token.is_empty())
            .finish()
    }
}
