use thiserror::Error;

/// Result type for Nanoleaf operations
pub type Result<T> = std::result::Result<T, NanoleafError>;

/// Errors that can occur when discovering or streaming to Nanoleaf panels
#[derive(Error, Debug)]
pub enum NanoleafError {
    /// Protocol version string is neither `v1` nor `v2`
    #[error("Invalid protocol version: {0:?}")]
    InvalidVersion(String),

    /// Device rejected the auth token (HTTP 401)
    #[error("Unauthorized: auth token rejected by device")]
    Unauthorized,

    /// Device answered with a status other than 200 or 401
    #[error("Unexpected response status: {0}")]
    UnexpectedResponse(u16),

    /// Activation response body is not the expected JSON
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// HTTP request could not be issued
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service discovery transport failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// `connect` was called before a successful activation
    #[error("Stream not activated")]
    NotActivated,

    /// Frames were submitted without an open connection
    #[error("Stream not connected")]
    NotConnected,

    /// Local UDP socket setup failed
    #[error("Connection error: {0}")]
    Connection(#[source] std::io::Error),

    /// Sending a datagram failed
    #[error("Transport error: {0}")]
    Transport(#[source] std::io::Error),
}

impl NanoleafError {
    /// Whether the device needs to be paired again to obtain a fresh token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NanoleafError::Unauthorized)
    }

    /// Whether the failure is operational and the call may be retried
    ///
    /// Device-side 5xx answers count as transient, other unexpected
    /// statuses do not.
    pub fn is_transient(&self) -> bool {
        match self {
            NanoleafError::Http(_)
            | NanoleafError::Discovery(_)
            | NanoleafError::Connection(_)
            | NanoleafError::Transport(_) => true,
            NanoleafError::UnexpectedResponse(status) => *status >= 500,
            _ => false,
        }
    }
}

impl From<mdns_sd::Error> for NanoleafError {
    fn from(err: mdns_sd::Error) -> Self {
        NanoleafError::Discovery(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors() {
        assert!(NanoleafError::Unauthorized.is_unauthorized());
        assert!(!NanoleafError::Unauthorized.is_transient());
        assert!(!NanoleafError::InvalidVersion("v3".into()).is_transient());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "unreachable");
        assert!(NanoleafError::Transport(io).is_transient());
    }

    #[test]
    fn only_server_errors_are_transient_statuses() {
        assert!(NanoleafError::UnexpectedResponse(500).is_transient());
        assert!(NanoleafError::UnexpectedResponse(503).is_transient());
        assert!(!NanoleafError::UnexpectedResponse(403).is_transient());
        assert!(!NanoleafError::UnexpectedResponse(404).is_transient());
        assert!(!NanoleafError::UnexpectedResponse(204).is_transient());
    }

    #[test]
    fn display_includes_status() {
        let err = NanoleafError::UnexpectedResponse(500);
        assert_eq!(err.to_string(), "Unexpected response status: 500");
    }
}
