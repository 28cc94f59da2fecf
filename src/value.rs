//! The in-memory datum tree produced by a `DatumReader` and consumed by a `DatumWriter`.

use indexmap::IndexMap;
use std::collections::HashMap;

/// A record's fields, keyed by name, preserving declaration/decode order.
pub type Record = IndexMap<String, Value>;

/// A map's entries. Avro maps are unordered; `HashMap` reflects that directly.
pub type Map = HashMap<String, Value>;

/// An in-memory Avro value: the datum tree shared by the reader, writer and validator.
///
/// Unions are represented transparently: decoding a union returns whichever
/// branch's value was selected, not a `Value::Union` wrapper — the wrapper
/// exists only as a guard so `DatumWriter::write` can reject a caller who
/// mistakenly pre-wraps a value meant for a union field (Avro unions must not
/// nest immediately inside one another, and a `Value` tree never needs to say
/// "this came from a union" to be written correctly).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The Avro `null` type; carries no data.
    Null,
    /// An Avro `boolean`.
    Boolean(bool),
    /// A 32-bit signed `int`.
    Int(i32),
    /// A 64-bit signed `long`.
    Long(i64),
    /// A 32-bit IEEE-754 `float`.
    Float(f32),
    /// A 64-bit IEEE-754 `double`.
    Double(f64),
    /// A length-prefixed, unbounded byte sequence.
    Bytes(Vec<u8>),
    /// A UTF-8 `string`.
    Str(String),
    /// A fixed-size, schema-declared raw byte sequence.
    Fixed(Vec<u8>),
    /// One symbol of an `enum` schema, by name.
    Enum(String),
    /// An `array` of values, all conforming to a single item schema.
    Array(Vec<Value>),
    /// A `map` from string keys to values of a single value schema.
    Map(Map),
    /// A `record`, `error`, or `request`: named fields in declaration order.
    Record(Record),
    /// A value picked from a `union`'s branches. See the type-level doc
    /// comment for why a decoded union value is never wrapped this way.
    Union(Box<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::Fixed(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Long(i)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}
