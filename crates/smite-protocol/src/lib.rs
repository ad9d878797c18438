//! Wire protocol for the Smite API.
//!
//! This crate defines how a request proves who sent it:
//!
//! - **Types** ([`Credentials`], [`DeveloperId`], [`Timestamp`],
//!   [`Platform`]): the values that appear in every signed URL.
//! - **Signing** ([`sign`]): the MD5 signature the service recomputes
//!   on its side. One second of clock drift invalidates it.
//! - **URLs** ([`RequestUrlBuilder`], [`SignedRequest`]): the fixed
//!   path template `<method>Json/<dev>/<sig>/[<session>/]<timestamp>`.
//! - **Clock** ([`Clock`]): where "now" comes from, swappable in tests.
//! - **Codec** ([`JsonCodec`]): decoding response bodies and spotting
//!   the `{status, message}` error envelope.
//!
//! # Architecture
//!
//! ```text
//! Session (token lifecycle) → Protocol (signature + URL) → Transport (HTTP)
//! ```
//!
//! Nothing in here does I/O. Everything is a pure function of its inputs
//! and the clock.

mod clock;
mod codec;
mod error;
mod signature;
mod types;
mod url;

pub use clock::{Clock, ManualClock, SystemClock};
#[cfg(feature = "json")]
pub use codec::{ErrorEnvelope, JsonCodec};
pub use error::ProtocolError;
pub use signature::sign;
pub use types::{AuthKey, Credentials, DeveloperId, Platform, Timestamp};
pub use url::{CREATE_SESSION_METHOD, RequestUrlBuilder, SignedRequest};
