//! # smite-api
//!
//! Signed, session-guarded client for the Smite game-statistics API.
//!
//! Every request to the service carries a developer id, an MD5 signature
//! over the method name and the current second, and (for everything but
//! `ping` and `createsession`) a session token that expires after fifteen
//! minutes. This crate keeps one such session alive and renews it lazily,
//! so callers only ever name a method and its parameters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smite_api::prelude::*;
//!
//! # async fn run() -> Result<(), ApiError> {
//! let credentials = load_credentials(Some("1004"), Some("23DF3C7E9BD14D84BF892AD206B6755C"))?;
//! let client = SmiteClient::builder()
//!     .platform(Platform::Pc)
//!     .build(credentials)?;
//!
//! let gods = client.gods(Language::English).await?;
//! let player = client.player("SomePlayer", None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! SmiteClient (endpoints) → CallGuard → SessionManager → RequestUrlBuilder → HttpTransport
//! ```

mod client;
mod config;
mod endpoints;
mod error;
mod guard;
pub mod params;

pub use client::SmiteClient;
pub use config::{SmiteClientBuilder, load_credentials};
pub use error::{ApiError, ConfigError};
pub use guard::{CallGuard, PathBuilder};

/// Convenient re-exports for typical usage.
///
/// ```rust
/// use smite_api::prelude::*;
/// ```
pub mod prelude {
    pub use crate::params::{Language, LeagueTier, MatchHour, Portal, RankedQueue, Split};
    pub use crate::{
        ApiError, CallGuard, ConfigError, PathBuilder, SmiteClient, SmiteClientBuilder,
        load_credentials,
    };

    pub use smite_protocol::{
        AuthKey, Clock, Credentials, DeveloperId, ManualClock, Platform, SystemClock, Timestamp,
    };
    pub use smite_session::{
        FileSessionStore, FreshToken, MemorySessionStore, Session, SessionConfig, SessionError,
        SessionState, SessionStore,
    };
    pub use smite_transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
}
