//! The serialization boundary between caller records and stored bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Converts records to their on-disk encoding and back.
///
/// Implementations must round-trip: decoding the output of `encode` yields a value equal to the
/// input. Encodings should be deterministic and human-inspectable, since operators are expected
/// to look at resource files directly.
///
/// Failures are reported as [`crate::Error::RecordSerialization`] and
/// [`crate::Error::RecordDeserialization`] respectively.
pub trait Codec: Send + Sync {
    /// File extension (without the leading dot) given to every resource written with this codec.
    fn extension(&self) -> &str;

    fn encode<RecordType: Serialize + ?Sized>(&self, record: &RecordType) -> Result<Vec<u8>>;

    fn decode<RecordType: DeserializeOwned>(&self, bytes: &[u8]) -> Result<RecordType>;
}
