//! Client configuration: credentials and the builder.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use smite_protocol::{
    AuthKey, Clock, Credentials, DeveloperId, Platform, RequestUrlBuilder,
    SystemClock,
};
use smite_session::{FileSessionStore, SessionConfig, SessionManager, SessionStore};
use smite_transport::{HttpTransport, ReqwestTransport};

use crate::{ApiError, CallGuard, ConfigError, SmiteClient};

/// Turns raw strings (flags, env vars, a secrets file) into
/// [`Credentials`].
///
/// # Errors
/// [`ConfigError`] if either value is missing or blank, or the developer
/// id isn't a positive integer.
pub fn load_credentials(
    developer_id: Option<&str>,
    auth_key: Option<&str>,
) -> Result<Credentials, ConfigError> {
    let developer_id = developer_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingDeveloperId)?;
    let developer_id = match developer_id.parse::<u32>() {
        Ok(id) if id > 0 => DeveloperId(id),
        _ => return Err(ConfigError::InvalidDeveloperId(developer_id.to_string())),
    };

    let auth_key = AuthKey::new(auth_key.map(str::trim).unwrap_or_default());
    if auth_key.is_blank() {
        return Err(ConfigError::MissingAuthKey);
    }

    Ok(Credentials::new(developer_id, auth_key))
}

/// Builder for configuring a [`SmiteClient`].
///
/// # Example
///
/// ```rust,no_run
/// use smite_api::prelude::*;
///
/// # fn main() -> Result<(), ApiError> {
/// let credentials = load_credentials(Some("1004"), Some("secret"))?;
/// let client = SmiteClient::builder()
///     .platform(Platform::Pc)
///     .session_dir("/var/lib/smite")
///     .build(credentials)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SmiteClientBuilder {
    platform: Platform,
    base_url: Option<String>,
    session_config: SessionConfig,
    session_dir: PathBuf,
    request_timeout: Duration,
}

impl SmiteClientBuilder {
    /// Directory used for the session records when none is given.
    pub const DEFAULT_SESSION_DIR: &'static str = ".smite-session";

    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            platform: Platform::default(),
            base_url: None,
            session_config: SessionConfig::default(),
            session_dir: PathBuf::from(Self::DEFAULT_SESSION_DIR),
            request_timeout: ReqwestTransport::DEFAULT_TIMEOUT,
        }
    }

    /// Picks the production host for `platform`.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Overrides the host entirely (proxies, mock servers). Wins over
    /// [`platform`](Self::platform).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the session configuration (TTL, createsession timeout).
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Where [`build`](Self::build) keeps the session records.
    pub fn session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    /// Per-request timeout for the default transport.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds a client with the production stack: sessions on disk,
    /// `reqwest` over the network, the system clock.
    ///
    /// # Errors
    /// If the HTTP client can't be initialized.
    pub fn build(
        self,
        credentials: Credentials,
    ) -> Result<SmiteClient<FileSessionStore, ReqwestTransport, SystemClock>, ApiError>
    {
        let store = FileSessionStore::new(self.session_dir.clone());
        let transport = ReqwestTransport::new(self.request_timeout)?;
        Ok(self.build_with(credentials, store, transport, SystemClock))
    }

    /// Builds a client from explicit parts. Used by tests and by callers
    /// with their own storage or HTTP stack.
    pub fn build_with<S, T, C>(
        self,
        credentials: Credentials,
        store: S,
        transport: T,
        clock: C,
    ) -> SmiteClient<S, T, C>
    where
        S: SessionStore,
        T: HttpTransport,
        C: Clock,
    {
        let urls = match self.base_url {
            Some(base) => RequestUrlBuilder::with_base_url(base, credentials, clock),
            None => RequestUrlBuilder::new(self.platform, credentials, clock),
        };
        tracing::debug!(base_url = urls.base_url(), "smite client configured");

        let sessions = SessionManager::new(store, transport, urls, self.session_config);
        SmiteClient::from_guard(CallGuard::new(Arc::new(sessions)))
    }
}

impl Default for SmiteClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
