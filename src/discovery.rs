use crate::device::Nanoleaf;
use crate::error::Result;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::protocol::{service_domain, SERVICE_TYPE};
use crate::types::Endpoint;
use async_trait::async_trait;
use mdns_sd::{ServiceDaemon, ServiceEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// One service instance answering a discovery query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub instance: String,
    pub host: String,
    pub port: u16,
}

/// Capability to resolve service instances on the local network
///
/// A query that times out without answers returns an empty list. Only
/// transport failures are errors.
#[async_trait]
pub trait ServiceBrowser: Send + Sync {
    async fn browse(&self, service_type: &str, timeout: Duration) -> Result<Vec<ServiceRecord>>;
}

/// mDNS / DNS-SD browser
///
/// A fresh daemon is started for every query and shut down afterwards, so
/// nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct MdnsBrowser;

impl MdnsBrowser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceBrowser for MdnsBrowser {
    async fn browse(&self, service_type: &str, timeout: Duration) -> Result<Vec<ServiceRecord>> {
        let daemon = DaemonGuard(ServiceDaemon::new()?);
        let receiver = daemon.0.browse(service_type)?;
        let deadline = Instant::now() + timeout;
        let mut records = Vec::new();

        loop {
            let event = match timeout_at(deadline, receiver.recv_async()).await {
                Ok(Ok(event)) => event,
                Ok(Err(_)) => {
                    tracing::debug!("mDNS event channel closed");
                    break;
                }
                Err(_) => break,
            };

            if let ServiceEvent::ServiceResolved(info) = event {
                let addresses = info.get_addresses();
                let address = addresses
                    .iter()
                    .find(|addr| addr.is_ipv4())
                    .or_else(|| addresses.iter().next());

                match address {
                    Some(addr) => {
                        tracing::debug!("Resolved {} at {}:{}", info.get_fullname(), addr, info.get_port());
                        records.push(ServiceRecord {
                            instance: info.get_fullname().to_string(),
                            host: addr.to_string(),
                            port: info.get_port(),
                        });
                    }
                    None => {
                        tracing::debug!("Skipping {} without address", info.get_fullname());
                    }
                }
            }
        }

        if let Err(e) = daemon.0.stop_browse(service_type) {
            tracing::debug!("Failed to stop mDNS browse: {}", e);
        }

        Ok(records)
    }
}

/// Shuts the mDNS daemon down on every exit path, including failed browses
struct DaemonGuard(ServiceDaemon);

impl Drop for DaemonGuard {
    fn drop(&mut self) {
        if let Err(e) = self.0.shutdown() {
            tracing::debug!("Failed to shut down mDNS daemon: {}", e);
        }
    }
}

/// Resolver for Nanoleaf devices on the local network
///
/// # Example
///
/// ```no_run
/// use nanoleaf_stream::Discovery;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let discovery = Discovery::new();
///     for endpoint in discovery.resolve(Duration::from_secs(2)).await? {
///         println!("Found device at {}", endpoint);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Discovery {
    browser: Arc<dyn ServiceBrowser>,
    http: Option<Arc<dyn HttpTransport>>,
}

impl Discovery {
    /// Create a resolver backed by mDNS
    pub fn new() -> Self {
        Self::with_browser(Arc::new(MdnsBrowser::new()))
    }

    /// Create a resolver on top of a custom browser
    pub fn with_browser(browser: Arc<dyn ServiceBrowser>) -> Self {
        Self {
            browser,
            http: None,
        }
    }

    /// HTTP transport handed to devices built by [`discover_devices`](Self::discover_devices)
    pub fn with_http(mut self, http: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(http);
        self
    }

    /// Query the network for devices until `timeout` elapses.
    ///
    /// Every answer yields one endpoint. A device answering twice shows up
    /// twice; deduplicate on the caller side if needed.
    pub async fn resolve(&self, timeout: Duration) -> Result<Vec<Endpoint>> {
        tracing::info!("Browsing for {} ({:?})", SERVICE_TYPE, timeout);

        let records = self.browser.browse(&service_domain(), timeout).await?;
        let endpoints: Vec<Endpoint> = records
            .into_iter()
            .map(|record| Endpoint::new(record.host, record.port))
            .collect();

        tracing::info!("Found {} device endpoint(s)", endpoints.len());
        Ok(endpoints)
    }

    /// Resolve devices and build one unauthenticated handle per endpoint
    pub async fn discover_devices(&self, timeout: Duration) -> Result<Vec<Nanoleaf>> {
        let endpoints = self.resolve(timeout).await?;
        let http: Arc<dyn HttpTransport> = match &self.http {
            Some(http) => http.clone(),
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(endpoints
            .iter()
            .map(|endpoint| Nanoleaf::from_endpoint(endpoint, http.clone()))
            .collect())
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve device endpoints with the default mDNS browser
pub async fn discover(timeout: Duration) -> Result<Vec<Endpoint>> {
    Discovery::new().resolve(timeout).await
}

/// Discover devices with the default mDNS browser and HTTP client
pub async fn discover_devices(timeout: Duration) -> Result<Vec<Nanoleaf>> {
    Discovery::new().discover_devices(timeout).await
}
