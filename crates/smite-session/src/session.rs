//! Session types: the token the service issued and when it was issued.

use std::time::Duration;

use smite_protocol::Timestamp;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a session is trusted after creation.
    ///
    /// Default: 14 minutes. The service keeps sessions for 15; the extra
    /// minute keeps a request that was signed just before the deadline
    /// from landing just after it.
    pub ttl: Duration,

    /// Upper bound on the createsession round trip. The renewal lock is
    /// held for at most this long.
    ///
    /// Default: 10 seconds.
    pub create_timeout: Duration,
}

impl SessionConfig {
    /// The longest the service itself keeps a session alive.
    pub const SERVICE_MAX_TTL: Duration = Duration::from_secs(15 * 60);

    /// Default config with a different TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(14 * 60),
            create_timeout: Duration::from_secs(10),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where the manager stands, as seen at one instant.
///
/// ```text
///   NoSession ──(create)──→ Valid ──(ttl elapses)──→ Stale
///                             ↑                        │
///                             └───────(renew)──────────┘
/// ```
///
/// There's no timer behind this. The state is recomputed from the stored
/// session and the clock every time someone asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing stored, or the stored record was unreadable.
    NoSession,

    /// A session younger than the TTL.
    Valid { age_secs: i64 },

    /// A session at or past the TTL (or stamped in the future).
    Stale { age_secs: i64 },
}

impl SessionState {
    /// Classifies `session` at unix time `now`.
    pub fn classify(session: Option<&Session>, now: i64, ttl: Duration) -> Self {
        match session {
            None => Self::NoSession,
            Some(s) if s.is_fresh(now, ttl) => Self::Valid {
                age_secs: s.age_secs(now),
            },
            Some(s) => Self::Stale {
                age_secs: s.age_secs(now),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A session token and the unix second it was issued at.
///
/// Replaced wholesale on renewal; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub created_at: i64,
}

impl Session {
    pub fn new(token: impl Into<String>, created_at: i64) -> Self {
        Self {
            token: token.into(),
            created_at,
        }
    }

    /// Seconds since creation. Negative if `created_at` is in the future.
    pub fn age_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.created_at)
    }

    /// `true` if `0 <= age < ttl`.
    ///
    /// A negative age means the clock went backwards since the record was
    /// written; we can't tell how old the token really is, so it doesn't
    /// count as fresh.
    pub fn is_fresh(&self, now: i64, ttl: Duration) -> bool {
        let age = self.age_secs(now);
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        (0..ttl).contains(&age)
    }
}

/// A token together with the second it was checked fresh at.
///
/// Sign the next request at `checked_at` and it is guaranteed to carry a
/// session younger than the TTL, however long the caller takes to send it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshToken {
    pub token: String,
    pub checked_at: Timestamp,
}
