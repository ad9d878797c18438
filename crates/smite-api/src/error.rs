//! Unified error type for the Smite API client.

use smite_protocol::ProtocolError;
use smite_session::SessionError;
use smite_transport::TransportError;

/// Credentials were missing or malformed. Raised before anything touches
/// the network; never retried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("developer id is not set")]
    MissingDeveloperId,

    #[error("developer id must be a positive integer, got {0:?}")]
    InvalidDeveloperId(String),

    #[error("auth key is not set")]
    MissingAuthKey,
}

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` lift a sub-crate error into this one.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed credentials.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No session could be obtained (SessionCreationError and friends).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The request never got an answer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body could not be decoded.
    #[error(transparent)]
    Protocol(ProtocolError),

    /// A parameter was rejected before any request was made.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// The service answered with a non-200 status.
    #[error("{method} returned HTTP {status}")]
    Status { method: String, status: u16 },

    /// The service answered 200 with an error envelope.
    #[error("{method} refused: {message}")]
    Remote { method: String, message: String },
}

impl ApiError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Bad codes are a caller mistake, so they surface as `Validation`; only
/// undecodable bodies stay `Protocol`.
impl From<ProtocolError> for ApiError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::InvalidCode { .. } | ProtocolError::InvalidTimestamp(_) => {
                Self::Validation(e.to_string())
            }
            other => Self::Protocol(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_error() {
        let err: ApiError = SessionError::Creation("HTTP 500".into()).into();
        assert!(matches!(err, ApiError::Session(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_from_transport_error() {
        let err: ApiError = TransportError::Timeout("slow".into()).into();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn test_from_config_error() {
        let err: ApiError = ConfigError::MissingAuthKey.into();
        assert!(matches!(err, ApiError::Config(ConfigError::MissingAuthKey)));
    }

    #[test]
    fn test_invalid_code_becomes_validation() {
        let err: ApiError = ProtocolError::InvalidCode {
            kind: "platform",
            value: 9,
        }
        .into();
        assert!(matches!(err, ApiError::Validation(ref m) if m.contains("platform")));
    }

    #[test]
    fn test_decode_error_stays_protocol() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = ProtocolError::Decode(json_err).into();
        assert!(matches!(err, ApiError::Protocol(_)));
    }
}
