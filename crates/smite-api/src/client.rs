//! `SmiteClient`: the handle callers hold.
//!
//! The client owns one [`CallGuard`], which owns the session manager. All
//! endpoint methods (see `endpoints.rs`) go through that guard; the only
//! exception is [`ping`](SmiteClient::ping), which the service answers
//! without a session.

use serde_json::Value;
use smite_protocol::{Clock, SystemClock};
use smite_session::{FileSessionStore, SessionManager, SessionState, SessionStore};
use smite_transport::{HttpTransport, ReqwestTransport};

use crate::{ApiError, CallGuard, SmiteClientBuilder};

/// A signed, session-guarded client for the Smite API.
///
/// Cloning is cheap: clones share the session, so a renewal done by one
/// is seen by all.
pub struct SmiteClient<S = FileSessionStore, T = ReqwestTransport, C = SystemClock>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    guard: CallGuard<S, T, C>,
}

impl SmiteClient {
    /// Creates a new builder.
    pub fn builder() -> SmiteClientBuilder {
        SmiteClientBuilder::new()
    }
}

impl<S, T, C> SmiteClient<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    pub fn from_guard(guard: CallGuard<S, T, C>) -> Self {
        Self { guard }
    }

    /// The guard every endpoint call goes through. Use it to reach
    /// methods this client has no wrapper for.
    pub fn guard(&self) -> &CallGuard<S, T, C> {
        &self.guard
    }

    pub fn sessions(&self) -> &SessionManager<S, T, C> {
        self.guard.sessions()
    }

    /// Classification of the stored session right now. Never renews.
    pub async fn session_state(&self) -> SessionState {
        self.guard.sessions().state().await
    }

    /// `ping`: checks the service is reachable. Unsigned, needs no
    /// session, and doesn't count against the daily request limit.
    pub async fn ping(&self) -> Result<Value, ApiError> {
        self.guard.ping().await
    }
}

impl<S, T, C> Clone for SmiteClient<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
        }
    }
}
