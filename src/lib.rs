//! Rust library for streaming colors to Nanoleaf light panels
//!
//! This library provides an async API for discovering Nanoleaf devices on the
//! local network and driving them through the low-latency "external control"
//! protocol. It supports:
//!
//! - Discovery via mDNS / DNS-SD (`_nanoleafapi._tcp`)
//! - External control activation over the device REST API
//! - Binary frame encoding for protocol versions v1 and v2
//! - UDP stream lifecycle (connect, send, disconnect)
//!
//! # Quick Start
//!
//! ```no_run
//! use nanoleaf_stream::{Discovery, FrameBatch, FrameColor};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let discovery = Discovery::new();
//!     let devices = discovery.discover_devices(Duration::from_secs(2)).await?;
//!
//!     if let Some(device) = devices.first() {
//!         let mut device = device.clone();
//!         device.set_token("auth-token-from-pairing");
//!
//!         let mut stream = device.stream();
//!         stream.activate("v2").await?;
//!         stream.connect().await?;
//!
//!         let mut batch = FrameBatch::new();
//!         batch.push(1, FrameColor::rgb(255, 0, 0, 1));
//!         stream.write_effect(&batch).await?;
//!
//!         stream.disconnect()?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Discovery**: mDNS resolution of device endpoints
//! - **Device**: handle holding base URL, auth token and HTTP transport
//! - **Stream**: activation handshake and UDP session
//! - **Codec**: v1 / v2 binary wire layout
//! - **Protocol**: JSON activation schema and constants

mod codec;
mod device;
mod discovery;
mod error;
mod http;
mod protocol;
mod stream;
#[cfg(test)]
mod test_utils;
mod types;

// Public exports
pub use codec::{encode, encoded_len};
pub use device::Nanoleaf;
pub use discovery::{discover, discover_devices, Discovery, MdnsBrowser, ServiceBrowser, ServiceRecord};
pub use error::{NanoleafError, Result};
pub use http::{HttpMethod, HttpResponse, HttpTransport, ReqwestTransport, REQUEST_TIMEOUT};
pub use protocol::{ActivationRequest, ActivationResponse, WriteCommand, API_PATH, SERVICE_TYPE};
pub use stream::{NanoStream, StreamState, StreamTarget};
pub use types::{Endpoint, FrameBatch, FrameColor, PanelFrame, PanelId, ProtocolVersion};
