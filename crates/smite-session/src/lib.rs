//! Session management for the Smite API.
//!
//! Almost every call to the service must carry a session token, and a
//! token is only good for fifteen minutes. This crate makes sure one is
//! always on hand:
//!
//! 1. **Persistence**: the current token survives restarts
//!    ([`SessionStore`], [`FileSessionStore`])
//! 2. **Expiry**: a token older than the configured TTL is treated as
//!    gone ([`SessionConfig`], [`SessionState`])
//! 3. **Renewal**: a fresh token is requested on demand, once, no matter
//!    how many callers notice at the same time ([`SessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! API Layer (above)  ← asks for a token before every call
//!     ↕
//! Session Layer (this crate)  ← owns the token and its expiry
//!     ↕
//! Protocol + Transport (below)  ← signs and sends createsession
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod manager;
mod session;
mod store;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{FreshToken, Session, SessionConfig, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
