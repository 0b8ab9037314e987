use crate::error::NanoleafError;
use crate::protocol::API_PATH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Panel identifier assigned by the device
pub type PanelId = u32;

/// Reachable address of a discovered device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    /// Create an endpoint for the device REST API at `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            path: API_PATH.to_string(),
        }
    }

    /// Base URL of the device API, e.g. `http://192.168.1.20:16021/api/v1`
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}{}", self.host, self.port, self.path)
        } else {
            format!("http://{}:{}{}", self.host, self.port, self.path)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// RGBW color plus transition time for one panel
///
/// Channel values are not range checked here. The wire encoder truncates
/// them to the field width of the session's protocol version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameColor {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub white: u32,

    /// Transition time in device units (100 ms)
    pub transition: u32,
}

impl FrameColor {
    pub fn new(red: u32, green: u32, blue: u32, white: u32, transition: u32) -> Self {
        Self {
            red,
            green,
            blue,
            white,
            transition,
        }
    }

    /// RGB color with no white component
    pub fn rgb(red: u32, green: u32, blue: u32, transition: u32) -> Self {
        Self::new(red, green, blue, 0, transition)
    }
}

/// Color instruction targeting one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelFrame {
    pub id: PanelId,
    pub frame: FrameColor,
}

impl PanelFrame {
    pub fn new(id: PanelId, frame: FrameColor) -> Self {
        Self { id, frame }
    }
}

/// Ordered set of panel frames sent as one datagram
///
/// Order is kept as given and duplicate panel ids are not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameBatch {
    pub panels: Vec<PanelFrame>,
}

impl FrameBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame for `id`
    pub fn push(&mut self, id: PanelId, frame: FrameColor) -> &mut Self {
        self.panels.push(PanelFrame::new(id, frame));
        self
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PanelFrame> {
        self.panels.iter()
    }
}

impl FromIterator<PanelFrame> for FrameBatch {
    fn from_iter<I: IntoIterator<Item = PanelFrame>>(iter: I) -> Self {
        Self {
            panels: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<PanelFrame>> for FrameBatch {
    fn from(panels: Vec<PanelFrame>) -> Self {
        Self { panels }
    }
}

/// External control protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::V1 => "v1",
            ProtocolVersion::V2 => "v2",
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = NanoleafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(ProtocolVersion::V1),
            "v2" => Ok(ProtocolVersion::V2),
            other => Err(NanoleafError::InvalidVersion(other.to_string())),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
