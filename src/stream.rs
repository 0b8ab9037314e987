use crate::codec;
use crate::device::Nanoleaf;
use crate::error::{NanoleafError, Result};
use crate::http::HttpMethod;
use crate::protocol::{effects_url, ActivationRequest, ActivationResponse};
use crate::types::{FrameBatch, ProtocolVersion};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

const STATUS_OK: u16 = 200;
const STATUS_UNAUTHORIZED: u16 = 401;

/// Lifecycle of a streaming session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No activation has succeeded yet
    Uninitialized,
    /// Device is in external control mode, no socket open
    Activated,
    /// UDP socket open, frames can be sent
    Connected,
    /// Socket released, can be reconnected
    Disconnected,
}

/// UDP target returned by the activation handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub address: String,
    pub port: u16,
}

/// External control session with one device
///
/// Activation (HTTP) and connection (UDP) are separate steps: re-activating,
/// e.g. after a token refresh, never touches an open socket. The session
/// owns its socket, which is released on `disconnect` or drop.
///
/// # Example
///
/// ```no_run
/// use nanoleaf_stream::{FrameBatch, FrameColor, Nanoleaf};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let device = Nanoleaf::with_token("http://192.168.1.20:16021/api/v1", "token")?;
///     let mut stream = device.stream();
///     stream.activate("v2").await?;
///     stream.connect().await?;
///
///     let mut batch = FrameBatch::new();
///     batch.push(1, FrameColor::rgb(255, 0, 0, 1));
///     stream.write_effect(&batch).await?;
///
///     stream.disconnect()?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct NanoStream {
    device: Nanoleaf,
    state: StreamState,
    version: Option<ProtocolVersion>,
    target: Option<StreamTarget>,
    socket: Option<UdpSocket>,
}

impl NanoStream {
    pub(crate) fn new(device: Nanoleaf) -> Self {
        Self {
            device,
            state: StreamState::Uninitialized,
            version: None,
            target: None,
            socket: None,
        }
    }

    /// Device this session is bound to
    pub fn device(&self) -> &Nanoleaf {
        &self.device
    }

    /// Mutable device access, e.g. to refresh the token before re-activating
    pub fn device_mut(&mut self) -> &mut Nanoleaf {
        &mut self.device
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Protocol version accepted by the last successful activation
    pub fn version(&self) -> Option<ProtocolVersion> {
        self.version
    }

    /// UDP target from the last successful activation
    pub fn target(&self) -> Option<&StreamTarget> {
        self.target.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.state == StreamState::Connected
    }

    /// Switch the device into external control mode.
    ///
    /// `version` must be `"v1"` or `"v2"`; anything else fails with
    /// [`NanoleafError::InvalidVersion`] without any network traffic.
    pub async fn activate(&mut self, version: &str) -> Result<()> {
        let version: ProtocolVersion = version.parse()?;
        self.activate_version(version).await
    }

    /// Typed variant of [`activate`](Self::activate)
    pub async fn activate_version(&mut self, version: ProtocolVersion) -> Result<()> {
        let url = effects_url(self.device.url(), self.device.token());
        let body = serde_json::to_value(ActivationRequest::external_control(version))?;

        tracing::info!("Activating external control {} on {}", version, self.device.url());
        let response = self
            .device
            .http()
            .send_json(HttpMethod::Put, &url, Some(body))
            .await?;

        if response.status == STATUS_UNAUTHORIZED {
            return Err(NanoleafError::Unauthorized);
        }
        if response.status != STATUS_OK {
            return Err(NanoleafError::UnexpectedResponse(response.status));
        }

        let target: ActivationResponse = serde_json::from_slice(&response.body)?;
        tracing::debug!("Stream target {}:{}", target.address, target.port);

        self.target = Some(StreamTarget {
            address: target.address,
            port: target.port,
        });
        self.version = Some(version);
        if self.state != StreamState::Connected {
            self.state = StreamState::Activated;
        }

        Ok(())
    }

    /// Open the UDP socket to the activated target.
    ///
    /// Only local socket setup is checked; UDP has no handshake. An already
    /// open socket is replaced.
    pub async fn connect(&mut self) -> Result<()> {
        let target = match &self.target {
            Some(target) if !target.address.is_empty() => target.clone(),
            _ => return Err(NanoleafError::NotActivated),
        };

        let remote = resolve_target(&target).await?;
        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(NanoleafError::Connection)?;
        socket
            .connect(remote)
            .await
            .map_err(NanoleafError::Connection)?;

        tracing::info!("Connected stream to {}", remote);
        self.socket = Some(socket);
        self.state = StreamState::Connected;
        Ok(())
    }

    /// Release the UDP socket.
    ///
    /// Disconnecting a session that is not connected is a no-op.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.socket.take().is_some() {
            tracing::info!("Disconnected stream from {}", self.device.url());
            self.state = StreamState::Disconnected;
        }
        Ok(())
    }

    /// Send one batch as a single datagram.
    ///
    /// An empty batch succeeds without sending anything, connected or not.
    pub async fn write_effect(&mut self, batch: &FrameBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let socket = self.socket.as_ref().ok_or(NanoleafError::NotConnected)?;
        let version = self.version.ok_or(NanoleafError::NotActivated)?;

        let datagram = codec::encode(version, batch);
        tracing::debug!("Sending {} panel(s) in {} bytes", batch.len(), datagram.len());

        socket
            .send(&datagram)
            .await
            .map_err(NanoleafError::Transport)?;
        Ok(())
    }
}

async fn resolve_target(target: &StreamTarget) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((target.address.as_str(), target.port))
        .await
        .map_err(NanoleafError::Connection)?;

    addrs.next().ok_or_else(|| {
        NanoleafError::Connection(std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("no address for {}", target.address),
        ))
    })
}
