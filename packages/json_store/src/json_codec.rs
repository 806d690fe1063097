//! JSON encoding for stored records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use tome_store::{Codec, Error, Result};

/// Pretty-printed JSON, tab-indented, one trailing newline.
///
/// # Example
///
/// ```rust
/// use tome_json_store::JsonCodec;
/// use tome_store::Codec;
///
/// let bytes = JsonCodec.encode(&vec![1, 2]).unwrap();
/// assert_eq!(bytes, b"[\n\t1,\n\t2\n]\n");
///
/// let decoded: Vec<u32> = JsonCodec.decode(&bytes).unwrap();
/// assert_eq!(decoded, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        "json"
    }

    fn encode<RecordType: Serialize + ?Sized>(&self, record: &RecordType) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut bytes, PrettyFormatter::with_indent(b"\t"));
        record
            .serialize(&mut serializer)
            .map_err(|err| Error::RecordSerialization {
                message: err.to_string(),
            })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode<RecordType: DeserializeOwned>(&self, bytes: &[u8]) -> Result<RecordType> {
        serde_json::from_slice(bytes).map_err(|err| Error::RecordDeserialization {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use serde_json::json;
    use tome_store::test_suite::User;

    #[test]
    fn encodes_human_readable_json() {
        let bytes = JsonCodec.encode(&json!({"Name": "alice", "Age": "24"})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n\t\"Age\": \"24\",\n\t\"Name\": \"alice\"\n}\n");
    }

    #[test]
    fn struct_records_survive_the_codec() {
        let user = User::new("Temi", "Smart Programmer");
        let bytes = JsonCodec.encode(&user).unwrap();
        assert!(bytes.ends_with(b"}\n"));
        let decoded: User = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn non_string_map_keys_fail_to_serialize() {
        let mut record = HashMap::new();
        record.insert((1, 2), "tuple keys are not JSON");

        let err = JsonCodec.encode(&record).unwrap_err();
        assert!(matches!(err, Error::RecordSerialization { .. }));
    }

    #[test]
    fn malformed_input_fails_to_deserialize() {
        let err = JsonCodec.decode::<User>(b"{\"name\": ").unwrap_err();
        assert!(matches!(err, Error::RecordDeserialization { .. }));

        let err = JsonCodec.decode::<User>(b"{\"name\": \"no other fields\"}").unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn extension() {
        assert_eq!(JsonCodec.extension(), "json");
    }
}
