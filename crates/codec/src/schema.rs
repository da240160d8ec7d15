// In crates/codec/src/schema.rs

//! The declared field layout of each record kind, and the validating
//! encode/decode path built on it.
//!
//! The lenient decoder in the crate root consults the same tables for
//! required-field checks, so there is one definition of what a `Stock` or a
//! `Trade` object contains.

use std::collections::BTreeMap;

use core_types::{wire, Record, RecordKind, DISCRIMINATOR};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::{CodecError, SchemaError, ValidationError};

/// The primitive shape a field must have on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Text,
    Integer,
    NonNegativeInteger,
    /// Decimal text, or a JSON integer.
    Decimal,
    Date,
    DateTime,
}

impl FieldShape {
    /// Checks a present, non-null value. Returns the failure message otherwise.
    pub fn check(self, value: &Value) -> Result<(), &'static str> {
        let ok = match self {
            FieldShape::Text => value.is_string(),
            FieldShape::Integer => value.as_i64().is_some(),
            FieldShape::NonNegativeInteger => {
                if value.as_i64().is_some_and(|n| n < 0) {
                    return Err("Must be greater than or equal to 0.");
                }
                value.as_u64().is_some()
            }
            FieldShape::Decimal => match value {
                Value::String(text) => wire::parse_decimal(text).is_ok(),
                Value::Number(n) => n.is_i64() || n.is_u64(),
                _ => false,
            },
            FieldShape::Date => value.as_str().is_some_and(|s| wire::parse_date(s).is_ok()),
            FieldShape::DateTime => value
                .as_str()
                .is_some_and(|s| wire::parse_timestamp(s).is_ok()),
        };
        if ok {
            Ok(())
        } else {
            Err(self.invalid_message())
        }
    }

    fn invalid_message(self) -> &'static str {
        match self {
            FieldShape::Text => "Not a valid string.",
            FieldShape::Integer | FieldShape::NonNegativeInteger => "Not a valid integer.",
            FieldShape::Decimal => "Not a valid decimal.",
            FieldShape::Date => "Not a valid date.",
            FieldShape::DateTime => "Not a valid datetime.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
}

const fn field(name: &'static str, shape: FieldShape) -> FieldSpec {
    FieldSpec { name, shape }
}

/// The fields of one record kind, in wire order. The discriminator is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub kind: RecordKind,
    pub fields: &'static [FieldSpec],
}

pub static STOCK_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Stock,
    fields: &[
        field("symbol", FieldShape::Text),
        field("date", FieldShape::Date),
        field("open", FieldShape::Decimal),
        field("high", FieldShape::Decimal),
        field("low", FieldShape::Decimal),
        field("close", FieldShape::Decimal),
        field("volume", FieldShape::NonNegativeInteger),
    ],
};

pub static TRADE_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Trade,
    fields: &[
        field("symbol", FieldShape::Text),
        field("timestamp", FieldShape::DateTime),
        field("order", FieldShape::Text),
        field("price", FieldShape::Decimal),
        field("volume", FieldShape::Integer),
        field("commission", FieldShape::Decimal),
    ],
};

pub fn schema_for(kind: RecordKind) -> &'static RecordSchema {
    match kind {
        RecordKind::Stock => &STOCK_SCHEMA,
        RecordKind::Trade => &TRADE_SCHEMA,
    }
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.name)
    }

    /// The first declared field absent from `map`, if any.
    pub fn missing_field(&self, map: &Map<String, Value>) -> Option<&'static str> {
        self.field_names().find(|name| !map.contains_key(*name))
    }

    /// Validates presence and primitive shape of every declared field.
    ///
    /// Keys the schema does not declare are rejected, except the discriminator,
    /// which only has to be a string. All problems are collected before
    /// returning.
    pub fn validate(&self, map: &Map<String, Value>) -> Result<(), ValidationError> {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut push = |name: &str, message: &str| {
            errors.entry(name.to_string()).or_default().push(message.to_string());
        };

        if let Some(tag) = map.get(DISCRIMINATOR) {
            if !tag.is_string() {
                push(DISCRIMINATOR, FieldShape::Text.invalid_message());
            }
        }

        for spec in self.fields {
            match map.get(spec.name) {
                None => push(spec.name, "Missing data for required field."),
                Some(Value::Null) => push(spec.name, "Field may not be null."),
                Some(value) => {
                    if let Err(message) = spec.shape.check(value) {
                        push(spec.name, message);
                    }
                }
            }
        }

        for key in map.keys() {
            if key != DISCRIMINATOR && self.field(key).is_none() {
                push(key, "Unknown field.");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                kind: self.kind,
                errors,
            })
        }
    }
}

/// Decodes one JSON object through `schema`, validating it first.
///
/// When the object's discriminator names the schema's kind the record is
/// built; otherwise the validated mapping is handed back unchanged.
pub fn deserialize_with_schema(json: &str, schema: &RecordSchema) -> Result<Document, SchemaError> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::InvalidJson)?;
    let map = value.as_object().ok_or(SchemaError::NotAnObject)?;
    schema.validate(map)?;

    let tagged = map
        .get(DISCRIMINATOR)
        .and_then(Value::as_str)
        .and_then(RecordKind::from_discriminator);

    match tagged {
        Some(kind) if kind == schema.kind => {
            let record = crate::build_record(kind, &value)?;
            tracing::debug!(kind = %kind, symbol = record.symbol(), "Schema-validated record decoded");
            Ok(Document::Record(record))
        }
        _ => {
            tracing::debug!(schema = %schema.kind, "Validated object has no matching discriminator; returning mapping");
            Ok(Document::from(value))
        }
    }
}

/// Encodes a record after checking the produced object against its schema.
pub fn serialize_with_schema(record: &Record) -> Result<String, SchemaError> {
    let value = serde_json::to_value(record).map_err(CodecError::UnsupportedEncodeType)?;
    let map = value.as_object().ok_or(SchemaError::NotAnObject)?;
    schema_for(record.kind()).validate(map)?;
    Ok(crate::encode(record)?)
}
