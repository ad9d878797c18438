//! Signed URL construction.
//!
//! Every call to the service is a GET whose path carries the proof of
//! identity:
//!
//! ```text
//! <base>/<method>Json/<developer_id>/<signature>/<session_token>/<timestamp>
//! <base>/createsessionJson/<developer_id>/<signature>/<timestamp>
//! ```
//!
//! The timestamp is taken from the clock at build time and hashed into
//! the signature, so a URL is only good for the second it was built in.
//! Nothing here is cached.

use std::fmt;

use crate::{Clock, Credentials, DeveloperId, Platform, Timestamp, sign};

/// Method name of the session-creation call. Signed, but carries no token.
pub const CREATE_SESSION_METHOD: &str = "createsession";

/// One fully signed request, before it is rendered to a URL.
///
/// Ephemeral: build it, render it, send it, drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: String,
    pub session_token: Option<String>,
    pub developer_id: DeveloperId,
    pub signature: String,
    pub timestamp: Timestamp,
}

impl SignedRequest {
    /// Renders the request against `base` (no trailing slash).
    ///
    /// Session-bearing methods use the lowercase `json` suffix and the
    /// token-less session call uses `Json`, matching what the service
    /// has always been sent. The service treats the suffix
    /// case-insensitively.
    pub fn url(&self, base: &str) -> String {
        match &self.session_token {
            Some(token) => format!(
                "{base}/{}json/{}/{}/{}/{}",
                self.method,
                self.developer_id,
                self.signature,
                token,
                self.timestamp
            ),
            None => format!(
                "{base}/{}Json/{}/{}/{}",
                self.method, self.developer_id, self.signature, self.timestamp
            ),
        }
    }
}

impl fmt::Display for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the non-secret parts; signatures are short-lived but still
        // not worth spraying into logs.
        write!(
            f,
            "{}@{}{}",
            self.method,
            self.timestamp,
            if self.session_token.is_some() { "+session" } else { "" }
        )
    }
}

/// Builds signed URLs for one set of credentials against one base URL.
#[derive(Debug)]
pub struct RequestUrlBuilder<C: Clock> {
    base_url: String,
    credentials: Credentials,
    clock: C,
}

impl<C: Clock> RequestUrlBuilder<C> {
    /// Creates a builder for `platform`'s production host.
    pub fn new(platform: Platform, credentials: Credentials, clock: C) -> Self {
        Self::with_base_url(platform.base_url(), credentials, clock)
    }

    /// Creates a builder against an explicit base URL (a proxy, a mock
    /// server). A trailing slash is stripped.
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Credentials,
        clock: C,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            credentials,
            clock,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn developer_id(&self) -> DeveloperId {
        self.credentials.developer_id
    }

    /// The clock every timestamp is taken from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Signs `method` at the current second.
    pub fn sign_request(
        &self,
        method: &str,
        session_token: Option<&str>,
    ) -> SignedRequest {
        self.sign_request_at(method, session_token, self.clock.timestamp())
    }

    /// Signs `method` at an explicit second. Used when the caller has
    /// already checked the session against that same second.
    pub fn sign_request_at(
        &self,
        method: &str,
        session_token: Option<&str>,
        timestamp: Timestamp,
    ) -> SignedRequest {
        let signature = sign(
            self.credentials.developer_id,
            method,
            &self.credentials.auth_key,
            &timestamp,
        );
        SignedRequest {
            method: method.to_string(),
            session_token: session_token.map(str::to_string),
            developer_id: self.credentials.developer_id,
            signature,
            timestamp,
        }
    }

    /// The signed base URL for a session-bearing method. Endpoint
    /// parameters are appended after it as further path segments.
    pub fn build_url(&self, method: &str, session_token: &str) -> String {
        self.build_url_at(method, session_token, self.clock.timestamp())
    }

    /// Like [`build_url`](Self::build_url), signed at `timestamp` instead
    /// of the current second.
    pub fn build_url_at(
        &self,
        method: &str,
        session_token: &str,
        timestamp: Timestamp,
    ) -> String {
        let request = self.sign_request_at(method, Some(session_token), timestamp);
        tracing::debug!(%request, "built signed url");
        request.url(&self.base_url)
    }

    /// The signed URL for `createsession`.
    pub fn session_url(&self) -> String {
        self.sign_request(CREATE_SESSION_METHOD, None)
            .url(&self.base_url)
    }

    /// The ping URL. Ping is the one call that is not signed at all.
    pub fn ping_url(&self) -> String {
        format!("{}/pingJson", self.base_url)
    }
}
