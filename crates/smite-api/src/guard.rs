//! The call guard: every endpoint goes through here.
//!
//! For each call the guard
//!   1. asks the session manager for a fresh token
//!   2. signs the method and builds the base URL
//!   3. lets the endpoint append its own path segments
//!   4. performs the GET
//!   5. turns the answer into JSON or a typed error
//!
//! Endpoints never see a token and can't skip the freshness check.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use smite_protocol::{Clock, ErrorEnvelope, JsonCodec};
use smite_session::{SessionManager, SessionStore};
use smite_transport::{HttpResponse, HttpTransport};

use crate::ApiError;

/// Appends endpoint parameters to a signed base URL.
///
/// Each [`segment`](Self::segment) is percent-encoded, so player names
/// with spaces or slashes can't break the path.
#[derive(Debug)]
pub struct PathBuilder {
    url: String,
}

impl PathBuilder {
    fn new(base: String) -> Self {
        Self { url: base }
    }

    /// Appends `/<value>`, percent-encoded.
    pub fn segment(&mut self, value: impl Display) -> &mut Self {
        self.url.push('/');
        self.url.push_str(&urlencoding::encode(&value.to_string()));
        self
    }

    /// Appends `/<a>,<b>,...`, each item percent-encoded and the commas
    /// left literal.
    pub fn list<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let joined = items
            .into_iter()
            .map(|item| urlencoding::encode(&item.to_string()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        self.url.push('/');
        self.url.push_str(&joined);
        self
    }

    /// Appends `/<value>` verbatim. Only for values already checked to be
    /// URL-safe (the `h,mm` hour format, for one).
    pub(crate) fn raw(&mut self, value: &str) -> &mut Self {
        self.url.push('/');
        self.url.push_str(value);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

/// Wraps every endpoint call with a session check and a fresh signature.
pub struct CallGuard<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    sessions: Arc<SessionManager<S, T, C>>,
}

impl<S, T, C> CallGuard<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    pub fn new(sessions: Arc<SessionManager<S, T, C>>) -> Self {
        Self { sessions }
    }

    /// The session manager behind this guard.
    pub fn sessions(&self) -> &SessionManager<S, T, C> {
        &self.sessions
    }

    /// Runs one guarded call and returns the body as untyped JSON.
    ///
    /// `extend` appends the endpoint's parameters; it runs after the
    /// session is secured and the URL is signed.
    ///
    /// # Errors
    /// - [`ApiError::Session`]: no valid session could be obtained
    /// - [`ApiError::Transport`]: no answer
    /// - [`ApiError::Status`]: non-200
    /// - [`ApiError::Protocol`]: body isn't JSON
    /// - [`ApiError::Remote`]: body is an error envelope
    pub async fn call<F>(&self, method: &str, extend: F) -> Result<Value, ApiError>
    where
        F: FnOnce(&mut PathBuilder) + Send,
    {
        let fresh = self.sessions.fresh_token().await?;

        // Signed at the second the session was checked, not a later one.
        let url = self
            .sessions
            .urls()
            .build_url_at(method, &fresh.token, fresh.checked_at);
        let mut path = PathBuilder::new(url);
        extend(&mut path);

        tracing::debug!(%method, "calling endpoint");
        let response = self.sessions.transport().get(path.as_str()).await?;
        decode_response(method, response)
    }

    /// Like [`call`](Self::call), but deserializes into `R`.
    pub async fn call_as<R, F>(&self, method: &str, extend: F) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        F: FnOnce(&mut PathBuilder) + Send,
    {
        let value = self.call(method, extend).await?;
        Ok(JsonCodec.from_value(value)?)
    }

    /// The unsigned ping. Bypasses the session entirely.
    pub async fn ping(&self) -> Result<Value, ApiError> {
        let url = self.sessions.urls().ping_url();
        let response = self.sessions.transport().get(&url).await?;
        decode_response("ping", response)
    }
}

impl<S, T, C> Clone for CallGuard<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Status check, JSON decode, error-envelope check. Nothing endpoint
/// specific.
fn decode_response(method: &str, response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_ok() {
        tracing::warn!(%method, status = response.status, "request refused");
        return Err(ApiError::Status {
            method: method.to_string(),
            status: response.status,
        });
    }

    let value = JsonCodec.decode_value(&response.body)?;
    if let Some(envelope) = ErrorEnvelope::detect(&value) {
        return Err(ApiError::Remote {
            method: method.to_string(),
            message: envelope.message,
        });
    }
    Ok(value)
}
