//! Response body decoding.
//!
//! The service answers every call with JSON. Most responses are either an
//! object or a list of objects whose shape belongs to the endpoint, not to
//! this crate. The one shape we do recognize is the error envelope
//! `{"status": "error", "message": "..."}`, which means "the call was
//! refused" no matter which endpoint produced it.

#![cfg(feature = "json")]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::ProtocolError;

/// A refusal reported inside a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
}

impl ErrorEnvelope {
    /// Returns the envelope if `value` is one.
    ///
    /// Only a top-level object whose `status` is `"error"` and whose
    /// `message` is a string counts. Anything else is endpoint data.
    pub fn detect(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let status = obj.get("status")?.as_str()?;
        if !status.eq_ignore_ascii_case("error") {
            return None;
        }
        let message = obj.get("message")?.as_str()?;
        Some(Self {
            status: status.to_string(),
            message: message.to_string(),
        })
    }
}

/// Decodes JSON bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Parses `data` as an untyped JSON value.
    pub fn decode_value(&self, data: &[u8]) -> Result<Value, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    /// Parses `data` into `T`.
    pub fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    /// Converts an already-parsed value into `T`.
    pub fn from_value<T: DeserializeOwned>(
        &self,
        value: Value,
    ) -> Result<T, ProtocolError> {
        serde_json::from_value(value).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_recognizes_error_envelope() {
        let v = json!({"status": "error", "message": "Invalid portal id"});
        let env = ErrorEnvelope::detect(&v).expect("should detect");
        assert_eq!(env.message, "Invalid portal id");
    }

    #[test]
    fn test_detect_ignores_endpoint_data() {
        assert!(ErrorEnvelope::detect(&json!([{"ret_msg": null}])).is_none());
        assert!(ErrorEnvelope::detect(&json!({"status": "ok", "message": "x"})).is_none());
        assert!(ErrorEnvelope::detect(&json!({"status": "error"})).is_none());
        assert!(ErrorEnvelope::detect(&json!({"status": 1, "message": "x"})).is_none());
    }

    #[test]
    fn test_decode_value_rejects_garbage() {
        let result = JsonCodec.decode_value(b"<html>503</html>");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_typed() {
        #[derive(Deserialize)]
        struct Motd {
            title: String,
        }
        let motd: Vec<Motd> = JsonCodec.decode(br#"[{"title":"Joust"}]"#).unwrap();
        assert_eq!(motd[0].title, "Joust");
    }
}
