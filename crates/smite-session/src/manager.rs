//! The session manager: hands out a token that is guaranteed fresh.
//!
//! # Concurrency note
//!
//! `ensure_session` runs entirely under one async mutex. Callers that
//! arrive while a renewal is in flight wait for it, then load the session
//! it just stored and find it valid. So at most one createsession request
//! is ever outstanding, and the account never burns two sessions for one
//! expiry. The remote call inside the lock is bounded by
//! [`SessionConfig::create_timeout`].

use serde::Deserialize;
use smite_protocol::{
    CREATE_SESSION_METHOD, Clock, JsonCodec, RequestUrlBuilder, Timestamp,
};
use smite_transport::{HttpTransport, TransportError};
use tokio::sync::Mutex;

use crate::{
    FreshToken, Session, SessionConfig, SessionError, SessionState, SessionStore,
};

/// Body of a createsession response. Only `session_id` matters; `ret_msg`
/// explains a refusal.
#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    #[serde(default)]
    ret_msg: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

/// Keeps one live session for a set of credentials.
///
/// ## Lifecycle
///
/// ```text
/// ensure_session()
///     │
///     ├─ load() → None ──────────────┐
///     ├─ load() → Stale ─────────────┤
///     │                              ▼
///     │                    createsession → save() → token
///     │
///     └─ load() → Valid ───────────────────────────→ token
/// ```
pub struct SessionManager<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    store: S,
    transport: T,
    urls: RequestUrlBuilder<C>,
    config: SessionConfig,
    /// Serializes check-and-renew.
    renewal: Mutex<()>,
}

impl<S, T, C> SessionManager<S, T, C>
where
    S: SessionStore,
    T: HttpTransport,
    C: Clock,
{
    /// Creates a manager. No I/O happens until the first
    /// [`ensure_session`](Self::ensure_session).
    pub fn new(
        store: S,
        transport: T,
        urls: RequestUrlBuilder<C>,
        config: SessionConfig,
    ) -> Self {
        if config.ttl > SessionConfig::SERVICE_MAX_TTL {
            tracing::warn!(
                ttl_secs = config.ttl.as_secs(),
                max_secs = SessionConfig::SERVICE_MAX_TTL.as_secs(),
                "session ttl exceeds the service limit; expect expired-session errors"
            );
        }
        Self {
            store,
            transport,
            urls,
            config,
            renewal: Mutex::new(()),
        }
    }

    /// Returns a token whose session is younger than the TTL right now,
    /// creating one first if needed.
    ///
    /// # Errors
    /// - [`SessionError::Creation`]: the service refused or answered
    ///   with something unusable
    /// - [`SessionError::Transport`]: no answer (timeout, connection)
    /// - [`SessionError::Store`]: the new session could not be persisted
    ///
    /// On any error no token is handed out. The store then holds the
    /// previous session, or none if a save failed halfway.
    pub async fn ensure_session(&self) -> Result<String, SessionError> {
        self.fresh_token().await.map(|fresh| fresh.token)
    }

    /// Like [`ensure_session`](Self::ensure_session), but also returns the
    /// second the token was found fresh at. A request signed at that
    /// second never carries a session aged `>= ttl`, no matter how much
    /// time passes before the URL is built.
    pub async fn fresh_token(&self) -> Result<FreshToken, SessionError> {
        let _renewal = self.renewal.lock().await;

        let checked_at = self.urls.clock().timestamp();
        let stored = self.store.load().await;

        match SessionState::classify(stored.as_ref(), checked_at.unix_secs(), self.config.ttl) {
            SessionState::Valid { age_secs } => {
                if let Some(session) = stored {
                    tracing::debug!(age_secs, "reusing session");
                    return Ok(FreshToken {
                        token: session.token,
                        checked_at,
                    });
                }
            }
            SessionState::Stale { age_secs } => {
                tracing::info!(age_secs, "session stale, renewing");
            }
            SessionState::NoSession => {
                tracing::info!("no stored session, creating one");
            }
        }

        let (session, created_at) = self.create_session().await?;
        self.store.save(&session).await?;
        tracing::info!(created_at = session.created_at, "session created");
        Ok(FreshToken {
            token: session.token,
            checked_at: created_at,
        })
    }

    /// The state of the stored session at this instant. Never renews.
    pub async fn state(&self) -> SessionState {
        let stored = self.store.load().await;
        SessionState::classify(stored.as_ref(), self.now(), self.config.ttl)
    }

    /// The stored session, fresh or not. Never renews.
    pub async fn current(&self) -> Option<Session> {
        self.store.load().await
    }

    /// The URL builder sharing this manager's credentials and clock.
    pub fn urls(&self) -> &RequestUrlBuilder<C> {
        &self.urls
    }

    /// The transport used for createsession.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn now(&self) -> i64 {
        self.urls.clock().now().timestamp()
    }

    /// Calls createsession. Does not touch the store. Returns the new
    /// session and the second its request was signed at.
    async fn create_session(&self) -> Result<(Session, Timestamp), SessionError> {
        let request = self.urls.sign_request(CREATE_SESSION_METHOD, None);
        let url = request.url(self.urls.base_url());

        let response = tokio::time::timeout(
            self.config.create_timeout,
            self.transport.get(&url),
        )
        .await
        .map_err(|_| {
            TransportError::Timeout(format!(
                "createsession took longer than {:?}",
                self.config.create_timeout
            ))
        })??;

        if !response.is_ok() {
            tracing::warn!(status = response.status, "createsession refused");
            return Err(SessionError::Creation(format!(
                "HTTP {}: {}",
                response.status,
                truncate(&response.body_text(), 200)
            )));
        }

        let body: CreateSessionResponse = JsonCodec
            .decode(&response.body)
            .map_err(|e| SessionError::Creation(e.to_string()))?;

        let token = body
            .session_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        match token {
            Some(token) if !token.contains('/') => {
                // Stamp with the signing time, not the arrival time: if
                // anything the session is considered slightly older than
                // it is.
                Ok((
                    Session::new(token, request.timestamp.unix_secs()),
                    request.timestamp,
                ))
            }
            Some(_) => Err(SessionError::Creation(
                "session_id contains a path separator".into(),
            )),
            None => Err(SessionError::Creation(format!(
                "no session_id in response ({})",
                body.ret_msg.as_deref().unwrap_or("no ret_msg")
            ))),
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`.
    //!
    //! Time is a `ManualClock`; the service is a stub transport that
    //! replays canned responses and counts requests.

    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use smite_protocol::{AuthKey, Credentials, DeveloperId, ManualClock};
    use smite_transport::HttpResponse;

    use super::*;
    use crate::MemorySessionStore;

    // -- Helpers ----------------------------------------------------------

    #[derive(Default)]
    struct StubTransport {
        responses: std::sync::Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        urls: std::sync::Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn replying(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_url(&self) -> Option<String> {
            self.urls.lock().unwrap().last().cloned()
        }
    }

    impl HttpTransport for StubTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("no canned response".into())))
        }
    }

    fn session_body(token: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(
            200,
            format!(r#"{{"ret_msg":"Approved","session_id":"{token}","timestamp":"1/1/2024 0:00:00 AM"}}"#),
        ))
    }

    type TestManager =
        SessionManager<Arc<MemorySessionStore>, Arc<StubTransport>, ManualClock>;

    fn manager(
        store: &Arc<MemorySessionStore>,
        transport: &Arc<StubTransport>,
        clock: &ManualClock,
    ) -> TestManager {
        let urls = RequestUrlBuilder::with_base_url(
            "https://api.example.test/smiteapi.svc",
            Credentials::new(DeveloperId(1004), AuthKey::new("secret")),
            clock.clone(),
        );
        SessionManager::new(
            Arc::clone(store),
            Arc::clone(transport),
            urls,
            SessionConfig::with_ttl(Duration::from_secs(840)),
        )
    }

    // =====================================================================
    // ensure_session()
    // =====================================================================

    #[tokio::test]
    async fn test_ensure_session_empty_store_creates_and_persists() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![session_body("abc")]));
        let clock = ManualClock::at(1_000);
        let mgr = manager(&store, &transport, &clock);

        let token = mgr.ensure_session().await.expect("should create");

        assert_eq!(token, "abc");
        assert_eq!(transport.calls(), 1);
        assert_eq!(store.current(), Some(Session::new("abc", 1_000)));
    }

    #[tokio::test]
    async fn test_ensure_session_create_url_is_signed_without_token() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![session_body("abc")]));
        let clock = ManualClock::at(1_700_000_000);
        let mgr = manager(&store, &transport, &clock);

        mgr.ensure_session().await.unwrap();

        let url = transport.last_url().unwrap();
        assert!(
            url.starts_with("https://api.example.test/smiteapi.svc/createsessionJson/1004/"),
            "unexpected url {url}"
        );
        assert!(url.ends_with("/20231114221320"));
        assert_eq!(url.matches('/').count(), 7);
    }

    #[tokio::test]
    async fn test_ensure_session_valid_session_is_reused() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 0)));
        let transport = Arc::new(StubTransport::default());
        let clock = ManualClock::at(500);
        let mgr = manager(&store, &transport, &clock);

        let token = mgr.ensure_session().await.unwrap();

        assert_eq!(token, "abc");
        assert_eq!(transport.calls(), 0);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_session_scenario_reuse_then_renew() {
        // TTL 840s; created at t=0 as "abc"; t=500 reuses; t=900 renews.
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 0)));
        let transport = Arc::new(StubTransport::replying(vec![session_body("xyz")]));
        let clock = ManualClock::at(0);
        let mgr = manager(&store, &transport, &clock);

        clock.set(500);
        assert_eq!(mgr.ensure_session().await.unwrap(), "abc");
        assert_eq!(transport.calls(), 0);

        clock.set(900);
        assert_eq!(mgr.ensure_session().await.unwrap(), "xyz");
        assert_eq!(transport.calls(), 1);
        assert_eq!(store.current(), Some(Session::new("xyz", 900)));
    }

    #[tokio::test]
    async fn test_ensure_session_exactly_at_ttl_renews() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 0)));
        let transport = Arc::new(StubTransport::replying(vec![session_body("xyz")]));
        let clock = ManualClock::at(840);
        let mgr = manager(&store, &transport, &clock);

        assert_eq!(mgr.ensure_session().await.unwrap(), "xyz");
        assert_eq!(transport.calls(), 1);
        assert_eq!(store.current().unwrap().created_at, 840);
    }

    #[tokio::test]
    async fn test_ensure_session_future_created_at_renews() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 5_000)));
        let transport = Arc::new(StubTransport::replying(vec![session_body("xyz")]));
        let clock = ManualClock::at(1_000);
        let mgr = manager(&store, &transport, &clock);

        assert_eq!(mgr.ensure_session().await.unwrap(), "xyz");
    }

    #[tokio::test]
    async fn test_ensure_session_http_500_fails_without_writing() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("old", 0)));
        let transport = Arc::new(StubTransport::replying(vec![Ok(HttpResponse::new(
            500,
            "Internal Server Error",
        ))]));
        let clock = ManualClock::at(10_000);
        let mgr = manager(&store, &transport, &clock);

        let err = mgr.ensure_session().await.unwrap_err();

        assert!(
            matches!(&err, SessionError::Creation(msg) if msg.contains("500")),
            "unexpected error: {err:?}"
        );
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.current(), Some(Session::new("old", 0)));
    }

    #[tokio::test]
    async fn test_ensure_session_malformed_body_is_creation_error() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![Ok(HttpResponse::new(
            200,
            "<html>maintenance</html>",
        ))]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        let err = mgr.ensure_session().await.unwrap_err();

        assert!(matches!(err, SessionError::Creation(_)));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_ensure_session_missing_session_id_reports_ret_msg() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![Ok(HttpResponse::new(
            200,
            r#"{"ret_msg":"Invalid Signature","session_id":null}"#,
        ))]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        let err = mgr.ensure_session().await.unwrap_err();

        assert!(
            matches!(&err, SessionError::Creation(msg) if msg.contains("Invalid Signature")),
            "unexpected error: {err:?}"
        );
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_ensure_session_empty_session_id_is_creation_error() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![session_body("  ")]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        assert!(matches!(
            mgr.ensure_session().await,
            Err(SessionError::Creation(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_session_token_with_slash_is_rejected() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![session_body("a/b")]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        assert!(matches!(
            mgr.ensure_session().await,
            Err(SessionError::Creation(_))
        ));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_ensure_session_network_failure_is_transport_error() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![Err(
            TransportError::Connect("refused".into()),
        )]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        let err = mgr.ensure_session().await.unwrap_err();

        assert!(matches!(err, SessionError::Transport(TransportError::Connect(_))));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_ensure_session_failure_is_not_retried() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![
            Ok(HttpResponse::new(503, "")),
            session_body("later"),
        ]));
        let mgr = manager(&store, &transport, &ManualClock::at(0));

        assert!(mgr.ensure_session().await.is_err());
        assert_eq!(transport.calls(), 1);

        // The caller retries the whole operation.
        assert_eq!(mgr.ensure_session().await.unwrap(), "later");
        assert_eq!(transport.calls(), 2);
    }

    // =====================================================================
    // state() / current()
    // =====================================================================

    // =====================================================================
    // fresh_token()
    // =====================================================================

    #[tokio::test]
    async fn test_fresh_token_reused_reports_checked_second() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 0)));
        let transport = Arc::new(StubTransport::default());
        let clock = ManualClock::at(839);
        let mgr = manager(&store, &transport, &clock);

        let fresh = mgr.fresh_token().await.unwrap();

        assert_eq!(fresh.token, "abc");
        assert_eq!(fresh.checked_at.unix_secs(), 839);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_fresh_token_renewed_reports_creation_second() {
        let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", 0)));
        let transport = Arc::new(StubTransport::replying(vec![session_body("xyz")]));
        let clock = ManualClock::at(840);
        let mgr = manager(&store, &transport, &clock);

        let fresh = mgr.fresh_token().await.unwrap();

        assert_eq!(fresh.token, "xyz");
        assert_eq!(fresh.checked_at.unix_secs(), 840);
        assert_eq!(store.current(), Some(Session::new("xyz", 840)));
    }

    #[tokio::test]
    async fn test_state_tracks_clock_without_renewing() {
        let store = Arc::new(MemorySessionStore::new());
        let transport = Arc::new(StubTransport::replying(vec![session_body("abc")]));
        let clock = ManualClock::at(0);
        let mgr = manager(&store, &transport, &clock);

        assert_eq!(mgr.state().await, SessionState::NoSession);

        mgr.ensure_session().await.unwrap();
        clock.set(100);
        assert_eq!(mgr.state().await, SessionState::Valid { age_secs: 100 });

        clock.set(841);
        assert_eq!(mgr.state().await, SessionState::Stale { age_secs: 841 });
        assert_eq!(transport.calls(), 1);
        assert_eq!(mgr.current().await.unwrap().token, "abc");
    }

    // =====================================================================
    // Timeouts
    // =====================================================================

    struct Hanging;

    impl HttpTransport for Hanging {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(HttpResponse::new(200, ""))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ensure_session_hanging_service_times_out() {
        let store = Arc::new(MemorySessionStore::new());
        let urls = RequestUrlBuilder::with_base_url(
            "https://api.example.test/smiteapi.svc",
            Credentials::new(DeveloperId(1004), AuthKey::new("secret")),
            ManualClock::at(0),
        );
        let mgr = SessionManager::new(
            Arc::clone(&store),
            Hanging,
            urls,
            SessionConfig {
                ttl: Duration::from_secs(840),
                create_timeout: Duration::from_secs(5),
            },
        );

        let err = mgr.ensure_session().await.unwrap_err();

        assert!(matches!(err, SessionError::Transport(ref e) if e.is_timeout()));
        assert!(store.current().is_none());
    }
}
