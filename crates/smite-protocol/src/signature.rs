//! The request signature.
//!
//! The service authenticates each call by recomputing
//! `md5(developer_id + method + auth_key + timestamp)` and comparing it to
//! the value in the URL. There are no delimiters between the parts and the
//! digest is rendered as lowercase hex.

use md5::{Digest, Md5};

use crate::{AuthKey, DeveloperId, Timestamp};

/// Computes the signature for one request.
///
/// Pure and deterministic: the same inputs always produce the same
/// 32-character hex string.
///
/// # Panics
///
/// If `method` is empty or contains anything other than ASCII
/// alphanumerics. Method names are compile-time constants in this
/// workspace, so a bad one is a programming error.
///
/// ```rust
/// use smite_protocol::{sign, AuthKey, DeveloperId, Timestamp};
///
/// let ts: Timestamp = "20120927183145".parse().unwrap();
/// let sig = sign(
///     DeveloperId(1004),
///     "createsession",
///     &AuthKey::new("23DF3C7E9BD14D84BF892AD206B6755C"),
///     &ts,
/// );
/// assert_eq!(sig, "8f53249be0922c94720834771ad43f0f");
/// ```
pub fn sign(
    developer_id: DeveloperId,
    method: &str,
    auth_key: &AuthKey,
    timestamp: &Timestamp,
) -> String {
    assert!(
        !method.is_empty() && method.bytes().all(|b| b.is_ascii_alphanumeric()),
        "method name must be non-empty ASCII alphanumeric, got {method:?}"
    );

    let mut hasher = Md5::new();
    hasher.update(developer_id.to_string().as_bytes());
    hasher.update(method.as_bytes());
    hasher.update(auth_key.expose().as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
