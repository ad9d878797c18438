//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` means the bytes were wrong, not the network and not
//! the session.

/// Errors that can occur while interpreting protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The response body was not valid JSON (or not the expected shape
    /// when decoding into a concrete type).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A timestamp string did not match `YYYYMMDDHHMMSS`.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A numeric code is outside the set the service accepts.
    #[error("invalid {kind}: {value}")]
    InvalidCode {
        /// What kind of code was rejected (e.g. "platform").
        kind: &'static str,
        /// The rejected raw value.
        value: i64,
    },
}
