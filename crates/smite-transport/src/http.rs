use std::time::Duration;

use crate::{HttpResponse, HttpTransport, TransportError};

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// The client keeps a connection pool, so build one transport and share it
/// (it's cheap to clone).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// If the TLS backend can't be initialized.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::trace!(status, len = body.len(), "http response");
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
