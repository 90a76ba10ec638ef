//! JSON payload serializer backed by `serde_json`.

use serde::Serialize;

use crate::ports::{PayloadSerializer, SerializationError};

/// Serializes payloads to compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadSerializer;

impl JsonPayloadSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadSerializer for JsonPayloadSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String, SerializationError> {
        serde_json::to_string(payload).map_err(|e| SerializationError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn serializes_struct_to_compact_json() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Summary {
            case_number: &'static str,
            open: bool,
        }

        let out = JsonPayloadSerializer::new()
            .serialize(&Summary {
                case_number: "C-1001",
                open: true,
            })
            .unwrap();

        assert_eq!(out, r#"{"caseNumber":"C-1001","open":true}"#);
    }

    #[test]
    fn serializes_unsized_str() {
        let out = JsonPayloadSerializer.serialize("hello").unwrap();
        assert_eq!(out, "\"hello\"");
    }

    #[test]
    fn serializes_json_values_verbatim() {
        let out = JsonPayloadSerializer.serialize(&json!({"id": 7})).unwrap();
        assert_eq!(out, r#"{"id":7}"#);
    }

    #[test]
    fn non_string_map_keys_fail() {
        let mut payload = HashMap::new();
        payload.insert((1, 2), "pair");

        let err = JsonPayloadSerializer.serialize(&payload).unwrap_err();

        assert!(err.reason.contains("key must be a string"));
    }
}
