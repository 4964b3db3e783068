//! Value Codecs
//!
//! This module defines the boundary between the store's file layout and the
//! byte payloads it frames. The storage layer never interprets payload
//! contents; it hands schemas, records, and the key index to a `ValueCodec`
//! and writes back whatever bytes come out.
//!
//! ## Default codec
//! [`BincodeCodec`] encodes everything with bincode over the serde derives
//! on the core types. Any codec whose encode/decode pairs round-trip is a
//! valid substitute; files are only portable between equal codecs.

use crate::error::{Error, Result};
use crate::key::KeyIndex;
use crate::schema::Schema;
use crate::value::{Record, Value};

/// Encodes and decodes the three payload kinds a store file frames: the
/// schema block, record blocks, and the index block.
///
/// Record methods take the file's schema so implementations can validate
/// shape on both sides; a mismatch is reported as [`Error::Codec`].
pub trait ValueCodec {
    /// Encode the schema block payload
    fn encode_schema(&self, schema: &Schema) -> Result<Vec<u8>>;

    /// Decode the schema block payload
    fn decode_schema(&self, buf: &[u8]) -> Result<Schema>;

    /// Encode one record against the file's schema
    fn encode_record(&self, schema: &Schema, record: &[Value]) -> Result<Vec<u8>>;

    /// Decode one record and validate it against the file's schema
    fn decode_record(&self, schema: &Schema, buf: &[u8]) -> Result<Record>;

    /// Encode the key index block payload
    fn encode_index(&self, index: &KeyIndex) -> Result<Vec<u8>>;

    /// Decode the key index block payload
    fn decode_index(&self, buf: &[u8]) -> Result<KeyIndex>;

    /// Infer the schema a first record fixes for the file
    fn infer_schema(&self, record: &[Value]) -> Result<Schema> {
        Ok(Schema::from_record(record))
    }
}

/// Default codec: bincode over the serde derives on the core types
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn codec_err(e: bincode::Error) -> Error {
        Error::Codec(e.to_string())
    }
}

impl ValueCodec for BincodeCodec {
    fn encode_schema(&self, schema: &Schema) -> Result<Vec<u8>> {
        bincode::serialize(schema).map_err(Self::codec_err)
    }

    fn decode_schema(&self, buf: &[u8]) -> Result<Schema> {
        bincode::deserialize(buf).map_err(Self::codec_err)
    }

    fn encode_record(&self, schema: &Schema, record: &[Value]) -> Result<Vec<u8>> {
        schema.check_record(record)?;
        bincode::serialize(record).map_err(Self::codec_err)
    }

    fn decode_record(&self, schema: &Schema, buf: &[u8]) -> Result<Record> {
        let record: Record = bincode::deserialize(buf).map_err(Self::codec_err)?;
        schema.check_record(&record)?;
        Ok(record)
    }

    fn encode_index(&self, index: &KeyIndex) -> Result<Vec<u8>> {
        bincode::serialize(index).map_err(Self::codec_err)
    }

    fn decode_index(&self, buf: &[u8]) -> Result<KeyIndex> {
        bincode::deserialize(buf).map_err(Self::codec_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    #[test]
    fn test_record_roundtrip() {
        let codec = BincodeCodec;
        let record = vec![
            Value::Int(7),
            Value::from("seven"),
            Value::FloatList(vec![0.5, 1.5]),
        ];
        let schema = Schema::from_record(&record);

        let buf = codec.encode_record(&schema, &record).unwrap();
        let decoded = codec.decode_record(&schema, &buf).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_rejects_schema_mismatch() {
        let codec = BincodeCodec;
        let schema = Schema::from_record(&[Value::Int(1)]);
        let err = codec.encode_record(&schema, &[Value::Float(1.0)]).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_decode_rejects_schema_mismatch() {
        let codec = BincodeCodec;
        let int_schema = Schema::from_record(&[Value::Int(1)]);
        let str_schema = Schema::from_record(&[Value::from("x")]);

        let buf = codec.encode_record(&int_schema, &[Value::Int(5)]).unwrap();
        let err = codec.decode_record(&str_schema, &buf).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_schema_roundtrip() {
        let codec = BincodeCodec;
        let schema = Schema::from_record(&[Value::Bytes(vec![1, 2]), Value::Int(0)]);
        let buf = codec.encode_schema(&schema).unwrap();
        assert_eq!(codec.decode_schema(&buf).unwrap(), schema);
    }

    #[test]
    fn test_index_roundtrip_is_deterministic() {
        let codec = BincodeCodec;
        let mut a = KeyIndex::new();
        a.insert(Key::from("alpha"), 99);
        a.insert(Key::from(100), 24);
        let mut b = KeyIndex::new();
        b.insert(Key::from(100), 24);
        b.insert(Key::from("alpha"), 99);

        // Same entries in any insertion order encode to the same bytes.
        let buf_a = codec.encode_index(&a).unwrap();
        let buf_b = codec.encode_index(&b).unwrap();
        assert_eq!(buf_a, buf_b);
        assert_eq!(codec.decode_index(&buf_a).unwrap(), a);
    }

    #[test]
    fn test_decode_garbage_is_codec_error() {
        let codec = BincodeCodec;
        let schema = Schema::from_record(&[Value::Int(1)]);
        // A length prefix pointing far past the buffer.
        let garbage = vec![0xFF; 16];
        assert!(matches!(
            codec.decode_record(&schema, &garbage),
            Err(Error::Codec(_))
        ));
        assert!(matches!(codec.decode_index(&garbage), Err(Error::Codec(_))));
    }
}
