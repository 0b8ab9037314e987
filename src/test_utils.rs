//! Test doubles for the HTTP and discovery collaborators

use crate::discovery::{ServiceBrowser, ServiceRecord};
use crate::error::{NanoleafError, Result};
use crate::http::{HttpMethod, HttpResponse, HttpTransport};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

/// HTTP transport answering every request with a canned response
pub(crate) struct MockHttp {
    response: HttpResponse,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttp {
    pub fn respond(status: u16, body: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse {
                status,
                body: body.to_vec(),
            },
            requests: Mutex::new(Vec::new()),
        })
    }

    /// 200 response pointing the stream at `address:port`
    pub fn target(address: &str, port: u16) -> Arc<Self> {
        let body = serde_json::json!({
            "streamControlIpAddr": address,
            "streamControlPort": port,
            "streamControlProtocol": "udp",
        });
        Self::respond(200, body.to_string().as_bytes())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockHttp {
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });
        Ok(self.response.clone())
    }
}

/// Browser returning a fixed record list, or failing
pub(crate) struct MockBrowser {
    records: Option<Vec<ServiceRecord>>,
    queries: Mutex<Vec<(String, Duration)>>,
}

impl MockBrowser {
    pub fn records(records: Vec<ServiceRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Some(records),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: None,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<(String, Duration)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceBrowser for MockBrowser {
    async fn browse(&self, service_type: &str, timeout: Duration) -> Result<Vec<ServiceRecord>> {
        self.queries
            .lock()
            .unwrap()
            .push((service_type.to_string(), timeout));
        self.records
            .clone()
            .ok_or_else(|| NanoleafError::Discovery("network unreachable".to_string()))
    }
}
