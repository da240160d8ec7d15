// In crates/codec/src/document.rs

use chrono::{NaiveDate, NaiveDateTime};
use core_types::{wire, PriceBar, Record, Timestamp, TradeExecution};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// A decoded JSON tree in which recognized objects have become records.
///
/// Anything that is not a typed record stays as plain JSON: objects become
/// `Map`, arrays become `Array` and everything else is a `Primitive`. Maps keep
/// their keys in the order they were read or inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Record(Record),
    Map(IndexMap<String, Document>),
    Array(Vec<Document>),
    /// A JSON null, bool, number or string.
    Primitive(Value),
}

impl Document {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Document::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Document::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Document>> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key when this document is a map.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Visits every record in the tree, depth first.
    pub fn records(&self) -> Vec<&Record> {
        let mut found = Vec::new();
        self.collect_records(&mut found);
        found
    }

    fn collect_records<'a>(&'a self, found: &mut Vec<&'a Record>) {
        match self {
            Document::Record(record) => found.push(record),
            Document::Map(map) => map.values().for_each(|child| child.collect_records(found)),
            Document::Array(items) => items.iter().for_each(|child| child.collect_records(found)),
            Document::Primitive(_) => {}
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Document::Record(_) => "record",
            Document::Map(_) => "map",
            Document::Array(_) => "array",
            Document::Primitive(Value::Null) => "null",
            Document::Primitive(_) => "primitive",
        }
    }
}

/// Lifts plain JSON as-is. No discriminator is interpreted; use
/// [`crate::decode_value`] for that.
impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => {
                Document::Map(map.into_iter().map(|(k, v)| (k, Document::from(v))).collect())
            }
            Value::Array(items) => Document::Array(items.into_iter().map(Document::from).collect()),
            other => Document::Primitive(other),
        }
    }
}

impl From<Record> for Document {
    fn from(record: Record) -> Self {
        Document::Record(record)
    }
}

impl From<PriceBar> for Document {
    fn from(bar: PriceBar) -> Self {
        Document::Record(Record::Stock(bar))
    }
}

impl From<TradeExecution> for Document {
    fn from(trade: TradeExecution) -> Self {
        Document::Record(Record::Trade(trade))
    }
}

// Bare decimals and dates outside a record use the same text as record fields.

impl From<Decimal> for Document {
    fn from(value: Decimal) -> Self {
        Document::Primitive(Value::String(value.to_string()))
    }
}

impl From<NaiveDate> for Document {
    fn from(value: NaiveDate) -> Self {
        Document::Primitive(Value::String(value.format(wire::DATE_FORMAT).to_string()))
    }
}

impl From<NaiveDateTime> for Document {
    fn from(value: NaiveDateTime) -> Self {
        Document::Primitive(Value::String(wire::format_datetime(&value)))
    }
}

impl From<Timestamp> for Document {
    fn from(value: Timestamp) -> Self {
        Document::Primitive(Value::String(wire::format_timestamp(&value)))
    }
}

impl<T: Into<Document>> From<Vec<T>> for Document {
    fn from(items: Vec<T>) -> Self {
        Document::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Document>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn lifting_json_keeps_objects_as_maps() {
        let doc = Document::from(json!({"_type": "Stock", "nested": [1, {"a": null}]}));
        let map = doc.as_map().unwrap();
        assert_eq!(map["_type"], Document::Primitive(json!("Stock")));
        let nested = doc.get("nested").and_then(Document::as_array).unwrap();
        assert_eq!(nested[0], Document::Primitive(json!(1)));
        assert_eq!(nested[1].get("a").map(Document::shape), Some("null"));
        assert!(doc.records().is_empty());
    }

    #[test]
    fn bare_values_use_wire_text() {
        assert_eq!(Document::from(dec!(337.60)), Document::Primitive(json!("337.60")));
        let date = NaiveDate::from_ymd_opt(2018, 11, 22).unwrap();
        assert_eq!(Document::from(date), Document::Primitive(json!("2018-11-22")));
        let timestamp = date.and_hms_opt(10, 5, 12).unwrap();
        assert_eq!(
            Document::from(timestamp),
            Document::Primitive(json!("2018-11-22T10:05:12"))
        );
        let offset = wire::parse_timestamp("2018-11-22T10:05:12-05:00").unwrap();
        assert_eq!(
            Document::from(offset),
            Document::Primitive(json!("2018-11-22T10:05:12-05:00"))
        );
    }

    #[test]
    fn serializes_untagged() {
        let doc: Document = [("b", Document::from(json!(2))), ("a", Document::from(json!([true])))]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"b":2,"a":[true]}"#);
    }

    #[test]
    fn lifted_objects_keep_key_order() {
        let value: Value = serde_json::from_str(r#"{"zeta":1,"alpha":{"y":2,"x":3}}"#).unwrap();
        let doc = Document::from(value);
        let keys: Vec<&str> = doc.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"zeta":1,"alpha":{"y":2,"x":3}}"#
        );
    }
}
