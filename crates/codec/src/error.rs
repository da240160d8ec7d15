// In crates/codec/src/error.rs

use std::collections::BTreeMap;

use core_types::RecordKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Input is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    #[error("{kind} record has a malformed value: {source}")]
    MalformedValue {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize value: {0}")]
    UnsupportedEncodeType(#[source] serde_json::Error),

    #[error("Expected a typed record at the top level, found {found}")]
    NotARecord { found: &'static str },
}

/// Every field that failed schema validation, with one or more messages each.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} failed schema validation on: {}", join_fields(.errors))]
pub struct ValidationError {
    pub kind: RecordKind,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Returns the messages recorded against `field`, if it failed.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }
}

fn join_fields(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Schema input must be a JSON object")]
    NotAnObject,
}

pub type Result<T> = std::result::Result<T, CodecError>;
