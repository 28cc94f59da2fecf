//! A pure structural predicate: does a `Value` conform to a `Variant`?
//!
//! Grounded in the teacher's `schema::Variant::validate`, turned into a plain
//! `bool` predicate (matching `avro/io.py`'s `validate`/`__type_to_validator__`
//! dispatch table) instead of returning a `Result` — mismatches are surfaced
//! with context by whichever caller needs an error (the writer engine).

use crate::schema::{Registry, Variant};
use crate::value::Value;

/// Returns `true` if `datum` is a legal instance of `schema`.
pub fn validate(schema: &Variant, datum: &Value, cxt: &Registry) -> bool {
    match (datum, schema) {
        (Value::Null, Variant::Null)
        | (Value::Boolean(_), Variant::Boolean)
        | (Value::Int(_), Variant::Int)
        | (Value::Long(_), Variant::Long)
        | (Value::Long(_), Variant::Float)
        | (Value::Long(_), Variant::Double)
        | (Value::Int(_), Variant::Long)
        | (Value::Int(_), Variant::Float)
        | (Value::Int(_), Variant::Double)
        | (Value::Float(_), Variant::Float)
        | (Value::Float(_), Variant::Double)
        | (Value::Double(_), Variant::Double)
        | (Value::Str(_), Variant::Str)
        | (Value::Bytes(_), Variant::Bytes) => true,

        (Value::Fixed(v), Variant::Fixed { size, .. })
        | (Value::Bytes(v), Variant::Fixed { size, .. }) => v.len() == *size,

        (Value::Enum(sym), Variant::Enum { symbols, .. }) => symbols.contains(sym),

        (Value::Record(rec), Variant::Record { fields, .. })
        | (Value::Record(rec), Variant::Error { fields, .. }) => fields
            .iter()
            .all(|(fname, field)| match rec.get(fname) {
                Some(fvalue) => validate(&field.ty, fvalue, cxt),
                None => field.has_default,
            }),

        (Value::Map(hmap), Variant::Map { values }) => {
            hmap.values().all(|v| validate(values, v, cxt))
        }

        (Value::Array(items), Variant::Array { items: item_schema }) => {
            items.iter().all(|v| validate(item_schema, v, cxt))
        }

        (v, Variant::Union { variants }) => {
            if let Value::Union(_) = v {
                false
            } else {
                variants.iter().any(|s| validate(s, v, cxt))
            }
        }

        (v, Variant::Named(name)) => match cxt.get(name) {
            Some(resolved) => validate(resolved, v, cxt),
            None => false,
        },

        _ => false,
    }
}
