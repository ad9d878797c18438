//! Core value types that appear in every signed request.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The numeric developer id issued by Hi-Rez.
///
/// It travels in clear text in every URL and is also the first input to
/// the signature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct DeveloperId(pub u32);

impl fmt::Display for DeveloperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The shared secret paired with a [`DeveloperId`].
///
/// Never sent over the wire; only hashed into signatures. `Debug` is
/// redacted so the key can't leak through logs or panic messages.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthKey(String);

impl AuthKey {
    /// Wraps a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for hashing.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(***)")
    }
}

/// Developer id + auth key. Immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub developer_id: DeveloperId,
    pub auth_key: AuthKey,
}

impl Credentials {
    pub fn new(developer_id: DeveloperId, auth_key: AuthKey) -> Self {
        Self {
            developer_id,
            auth_key,
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A UTC instant rendered the way the service wants it: `YYYYMMDDHHMMSS`.
///
/// Sub-second precision is dropped on construction. The signature and the
/// URL must carry the *same* rendered string, so a `Timestamp` is created
/// once per request and then only formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The `strftime` pattern the service uses.
    pub const FORMAT: &'static str = "%Y%m%d%H%M%S";

    /// Truncates `at` to whole seconds.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        // Whole seconds always round-trip, so the fallback is unreachable
        // in practice.
        Self(DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at))
    }

    /// Builds a timestamp from unix seconds. `None` if out of range.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Seconds since the unix epoch.
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts variable-width fields; the wire format doesn't.
        if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::InvalidTimestamp(s.to_string()));
        }
        let naive = NaiveDateTime::parse_from_str(s, Self::FORMAT)
            .map_err(|_| ProtocolError::InvalidTimestamp(s.to_string()))?;
        Ok(Self(naive.and_utc()))
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Which deployment of the API to talk to.
///
/// Console platforms have their own hosts and serve plain HTTP.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum Platform {
    #[default]
    Pc,
    Xbox,
    Ps4,
}

impl Platform {
    /// Base URL of the service for this platform, without trailing slash.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Pc => "https://api.smitegame.com/smiteapi.svc",
            Self::Xbox => "http://api.xbox.smitegame.com/smiteapi.svc",
            Self::Ps4 => "http://api.ps4.smitegame.com/smiteapi.svc",
        }
    }
}

/// `0` = PC, `1` = Xbox, `2` = PS4.
impl TryFrom<u8> for Platform {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pc),
            1 => Ok(Self::Xbox),
            2 => Ok(Self::Ps4),
            other => Err(ProtocolError::InvalidCode {
                kind: "platform",
                value: i64::from(other),
            }),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pc => write!(f, "pc"),
            Self::Xbox => write!(f, "xbox"),
            Self::Ps4 => write!(f, "ps4"),
        }
    }
}
