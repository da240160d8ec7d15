// In crates/codec/src/lib.rs

//! JSON encoding and decoding for [`PriceBar`] and [`TradeExecution`].
//!
//! Every encoded record is an object whose first key is `_type` (`"Stock"` or
//! `"Trade"`). Decimals travel as strings so no precision is lost, dates and
//! date-times as ISO-8601 strings, and volumes as JSON integers. Decoding
//! turns tagged objects back into records and hands every other object back
//! as a plain mapping.

use core_types::{DISCRIMINATOR, PriceBar, Record, RecordKind, TradeExecution};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod document;
pub mod error;
pub mod schema;

// Re-export the most important types for easy access.
pub use document::Document;
pub use error::{CodecError, Result, SchemaError, ValidationError};
pub use schema::{
    FieldShape, FieldSpec, RecordSchema, STOCK_SCHEMA, TRADE_SCHEMA, deserialize_with_schema,
    schema_for, serialize_with_schema,
};

/// Encodes a record, a [`Document`], or any other serializable value as compact JSON.
///
/// # Errors
///
/// `CodecError::UnsupportedEncodeType` if the value has no JSON representation,
/// e.g. a map keyed by something other than strings.
pub fn encode<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(CodecError::UnsupportedEncodeType)
}

/// Same as [`encode`], indented for people.
pub fn encode_pretty<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value).map_err(CodecError::UnsupportedEncodeType)
}

/// Parses JSON text and decodes it into a [`Document`].
pub fn decode(json: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::InvalidJson)?;
    decode_value(&value)
}

pub fn decode_slice(bytes: &[u8]) -> Result<Document> {
    let value: Value = serde_json::from_slice(bytes).map_err(CodecError::InvalidJson)?;
    decode_value(&value)
}

/// Decodes an already parsed JSON value.
///
/// Objects are examined innermost first. An object whose `_type` is `"Stock"`
/// or `"Trade"` becomes a record and must then be complete and well formed;
/// any other object, tagged or not, is returned as a mapping with the same
/// keys and values.
pub fn decode_value(value: &Value) -> Result<Document> {
    match value {
        Value::Object(map) => decode_object(value, map),
        Value::Array(items) => items
            .iter()
            .map(decode_value)
            .collect::<Result<Vec<_>>>()
            .map(Document::Array),
        other => Ok(Document::Primitive(other.clone())),
    }
}

/// Decodes JSON text that must hold exactly one typed record.
pub fn decode_record(json: &str) -> Result<Record> {
    match decode(json)? {
        Document::Record(record) => Ok(record),
        other => Err(CodecError::NotARecord {
            found: other.shape(),
        }),
    }
}

fn decode_object(value: &Value, map: &Map<String, Value>) -> Result<Document> {
    let kind = match map.get(DISCRIMINATOR) {
        None => None,
        Some(Value::String(tag)) => {
            let kind = RecordKind::from_discriminator(tag);
            if kind.is_none() {
                tracing::debug!(%tag, "Unrecognized discriminator; passing mapping through");
            }
            kind
        }
        Some(other) => {
            tracing::debug!(tag = %other, "Non-string discriminator; passing mapping through");
            None
        }
    };

    match kind {
        Some(kind) => {
            // Nested containers go first so a bad inner record fails the whole decode.
            for child in map.values().filter(|v| v.is_object() || v.is_array()) {
                decode_value(child)?;
            }
            tracing::trace!(%kind, "Decoding typed record");
            build_record(kind, value).map(Document::Record)
        }
        None => map
            .iter()
            .map(|(key, child)| Ok((key.clone(), decode_value(child)?)))
            .collect::<Result<IndexMap<_, _>>>()
            .map(Document::Map),
    }
}

/// Builds a record of `kind` from a tagged JSON object. Keys the record does
/// not declare are ignored.
pub(crate) fn build_record(kind: RecordKind, value: &Value) -> Result<Record> {
    if let Some(field) = value
        .as_object()
        .and_then(|map| schema_for(kind).missing_field(map))
    {
        return Err(CodecError::MissingField { kind, field });
    }

    let record = match kind {
        RecordKind::Stock => PriceBar::deserialize(value).map(Record::Stock),
        RecordKind::Trade => TradeExecution::deserialize(value).map(Record::Trade),
    };
    record.map_err(|source| CodecError::MalformedValue { kind, source })
}
