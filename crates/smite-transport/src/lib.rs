//! Transport abstraction layer for the Smite API.
//!
//! Provides the [`HttpTransport`] trait: one async GET that hands back the
//! status code and raw body. Everything above this layer (sessions, the
//! call guard, endpoints) talks to the trait, so tests can swap in a stub
//! that counts calls or fails on demand.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): [`ReqwestTransport`] backed by `reqwest`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "reqwest")]
mod http;

pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use http::ReqwestTransport;

use std::future::Future;
use std::sync::Arc;

/// What came back from one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for a 200. The service never answers with other 2xx
    /// codes, and callers treat anything else as a refusal.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// The body as (lossy) UTF-8, for error messages.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs HTTP GETs.
///
/// Implementations must apply their own request timeout; callers never
/// wait on a transport without bound.
pub trait HttpTransport: Send + Sync + 'static {
    /// Fetches `url`.
    ///
    /// A non-200 status is *not* an error at this layer; it comes back as
    /// an [`HttpResponse`] so the caller can decide what it means.
    ///
    /// # Errors
    /// [`TransportError`] when no response arrived at all (timeout,
    /// refused connection, broken body).
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).get(url)
    }
}
