use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};

/// DNS-SD service type advertised by the panels
pub const SERVICE_TYPE: &str = "_nanoleafapi._tcp";

/// Path suffix of the device REST API
pub const API_PATH: &str = "/api/v1";

const DISPLAY_COMMAND: &str = "display";
const EXT_CONTROL_ANIM: &str = "extControl";

/// Fully qualified service name used for mDNS browsing
pub fn service_domain() -> String {
    format!("{}.local.", SERVICE_TYPE)
}

/// Body of the `PUT {base}/{token}/effects` activation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationRequest {
    pub write: WriteCommand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteCommand {
    pub command: String,
    #[serde(rename = "animType")]
    pub anim_type: String,
    #[serde(rename = "extControlVersion")]
    pub ext_control_version: ProtocolVersion,
}

impl ActivationRequest {
    /// Request switching the device into external control mode
    pub fn external_control(version: ProtocolVersion) -> Self {
        Self {
            write: WriteCommand {
                command: DISPLAY_COMMAND.to_string(),
                anim_type: EXT_CONTROL_ANIM.to_string(),
                ext_control_version: version,
            },
        }
    }
}

/// Activation response carrying the UDP target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationResponse {
    #[serde(rename = "streamControlIpAddr")]
    pub address: String,
    #[serde(rename = "streamControlPort")]
    pub port: u16,
}

/// URL of the effects endpoint for a device
pub fn effects_url(base_url: &str, token: &str) -> String {
    format!("{}/{}/effects", base_url.trim_end_matches('/'), token)
}
