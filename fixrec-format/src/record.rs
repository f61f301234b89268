use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Widening integer view, for range checks.
    #[inline(always)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int32(v) => Some(i64::from(*v)),
            FieldValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Widening float view, for range checks.
    #[inline(always)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float32(v) => Some(f64::from(*v)),
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int32(_) => "i32",
            FieldValue::Int64(_) => "i64",
            FieldValue::Float32(_) => "f32",
            FieldValue::Float64(_) => "f64",
            FieldValue::Text(_) => "text",
            FieldValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int32(v) => write!(f, "{}", v),
            FieldValue::Int64(v) => write!(f, "{}", v),
            FieldValue::Float32(v) => write!(f, "{}", v),
            FieldValue::Float64(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "'{}'", s),
            FieldValue::Bytes(b) => write!(f, "{} bytes", b.len()),
        }
    }
}

/// One decoded record: named field values plus its position in the file.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    record_number: u64,
    byte_offset: u64,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub(crate) fn new(
        record_number: u64,
        byte_offset: u64,
        fields: Vec<(String, FieldValue)>,
    ) -> Record {
        Record {
            record_number,
            byte_offset,
            fields,
        }
    }

    /// 1-based ordinal position of this record in its file.
    #[inline(always)]
    pub fn record_number(&self) -> u64 {
        self.record_number
    }

    /// Byte offset in the file where this record starts.
    #[inline(always)]
    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    /// Field values in layout order.
    #[inline(always)]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Fields<'a>(&'a [(String, FieldValue)]);

        impl Serialize for Fields<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, value) in self.0 {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }

        let mut s = serializer.serialize_struct("Record", 3)?;
        s.serialize_field("record_number", &self.record_number)?;
        s.serialize_field("byte_offset", &self.byte_offset)?;
        s.serialize_field("fields", &Fields(&self.fields))?;
        s.end()
    }
}
