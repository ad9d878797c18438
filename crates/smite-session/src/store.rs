//! Where the current session lives between calls and between runs.
//!
//! The manager only needs two things from storage: "what's the last
//! session?" and "remember this one". Both are behind the
//! [`SessionStore`] trait so the same manager runs against disk in
//! production and against memory in tests.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{Session, SessionError};

/// Persists the current session.
///
/// # Contract
///
/// - `load` never fails. Missing, partial, or garbled records all come
///   back as `None`, which the manager treats as "create a new session".
/// - `save` writes the token and its creation time together. If it
///   fails, `load` returns either the previous session or `None`, never
///   a new token paired with an old timestamp.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the stored session, if there is a readable one.
    fn load(&self) -> impl Future<Output = Option<Session>> + Send;

    /// Replaces the stored session.
    ///
    /// # Errors
    /// [`SessionError::Store`] if the session could not be written.
    fn save(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}

impl<S: SessionStore> SessionStore for Arc<S> {
    fn load(&self) -> impl Future<Output = Option<Session>> + Send {
        (**self).load()
    }

    fn save(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        (**self).save(session)
    }
}

// ---------------------------------------------------------------------------
// MemorySessionStore
// ---------------------------------------------------------------------------

/// Keeps the session in process memory. Gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
    saves: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The stored session, without going through the async trait.
    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// How many times `save` has succeeded.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        // The data is a plain Option; a panic elsewhere can't leave it
        // half-written.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<Session> {
        self.current()
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.lock() = Some(session.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileSessionStore
// ---------------------------------------------------------------------------

/// Keeps the session in two small text files inside a directory:
///
/// ```text
/// <dir>/session_token        the token, as issued
/// <dir>/session_created_at   unix seconds, decimal
/// ```
///
/// Each file is written to a `.tmp` sibling first and renamed into place,
/// so a reader never sees half a token. If the second rename fails the
/// new token is removed again, leaving no session rather than a
/// mismatched pair. The directory is assumed to be owned by one process.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    const TOKEN_FILE: &'static str = "session_token";
    const CREATED_AT_FILE: &'static str = "session_created_at";

    /// Uses `dir` for the records. It's created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(Self::TOKEN_FILE)
    }

    fn created_at_path(&self) -> PathBuf {
        self.dir.join(Self::CREATED_AT_FILE)
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self) -> Option<Session> {
        let token = read_record(&self.token_path()).await?;
        let created_at = read_record(&self.created_at_path()).await?;

        let created_at = match created_at.parse::<i64>() {
            Ok(secs) => secs,
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "stored session timestamp is malformed, ignoring"
                );
                return None;
            }
        };

        Some(Session::new(token, created_at))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(SessionError::Store)?;

        let token_path = self.token_path();
        let created_at_path = self.created_at_path();
        let token_tmp = token_path.with_extension("tmp");
        let created_at_tmp = created_at_path.with_extension("tmp");

        // Stage both, then swap both, to keep the window where the pair
        // disagrees as small as possible.
        tokio::fs::write(&token_tmp, session.token.as_bytes())
            .await
            .map_err(SessionError::Store)?;
        tokio::fs::write(&created_at_tmp, session.created_at.to_string())
            .await
            .map_err(SessionError::Store)?;
        tokio::fs::rename(&token_tmp, &token_path)
            .await
            .map_err(SessionError::Store)?;
        if let Err(e) = tokio::fs::rename(&created_at_tmp, &created_at_path).await {
            // The new token is in place but its timestamp isn't. Drop the
            // token so the half-written pair reads as no session at all.
            if let Err(cleanup) = tokio::fs::remove_file(&token_path).await {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %cleanup,
                    "could not remove token after failed save"
                );
            }
            let _ = tokio::fs::remove_file(&created_at_tmp).await;
            return Err(SessionError::Store(e));
        }

        tracing::debug!(dir = %self.dir.display(), "session persisted");
        Ok(())
    }
}

/// Reads one trimmed, non-empty record. Anything else is `None`.
async fn read_record(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let value = contents.trim();
            if value.is_empty() {
                tracing::warn!(path = %path.display(), "session record is empty");
                None
            } else {
                Some(value.to_string())
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no session record");
            None
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "session record unreadable, ignoring"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_starts_empty() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces() {
        let store = MemorySessionStore::with_session(Session::new("old", 1));

        store.save(&Session::new("new", 2)).await.unwrap();

        assert_eq!(store.load().await, Some(Session::new("new", 2)));
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_arc_store_shares_state() {
        let store = Arc::new(MemorySessionStore::new());
        let handle = Arc::clone(&store);

        store.save(&Session::new("abc", 10)).await.unwrap();

        assert_eq!(handle.current(), Some(Session::new("abc", 10)));
    }
}
