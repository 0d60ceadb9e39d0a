//! Byte-level encoding of structured documents crossing the boundary.
//!
//! Each payload field of an envelope is encoded and decoded individually;
//! the bridge never interprets document contents.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use serde_json::{json, Value};

    #[test]
    fn document_round_trip() {
        let doc = json!({
            "kind": "Pod",
            "metadata": { "name": "web-0", "labels": { "app": "web" } },
            "spec": { "containers": [{ "name": "web", "ports": [80, 443] }] },
        });
        let bytes = encode(&doc).unwrap();
        let back: Value = decode(&bytes).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        let err = decode::<Value>(b"{not json").unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }
}
