/// Errors that can occur in the transport layer.
///
/// All of these are transient from the caller's point of view: nothing is
/// retried here, the caller's own retry policy decides.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request failed for another reason (TLS, redirect loop, ...).
    #[error("request failed: {0}")]
    Request(String),

    /// Headers arrived but reading the body failed.
    #[error("reading response body failed: {0}")]
    Body(String),
}

impl TransportError {
    /// Returns `true` if the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest includes the full URL in its messages, and our URLs
        // carry a signature and a session token.
        let e = e.without_url();
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}
