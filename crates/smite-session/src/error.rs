//! Error types for the session layer.

use smite_transport::TransportError;

/// Errors that can occur while obtaining or persisting a session.
///
/// A missing or unreadable stored session is *not* an error: the store
/// reports it as absent and the manager creates a new one.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The service refused to create a session: non-200 status, a body
    /// that isn't JSON, or no `session_id` in it.
    ///
    /// Not retried. The caller may retry the whole operation later.
    #[error("session creation failed: {0}")]
    Creation(String),

    /// The createsession request never got an answer (timeout, refused
    /// connection).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A fresh session was issued but could not be written to the store.
    #[error("persisting session failed: {0}")]
    Store(#[source] std::io::Error),
}
