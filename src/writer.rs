//! Encodes a `Value` tree to wire bytes per a writer schema.
//!
//! Grounded in the teacher's `writer.rs` validate-then-encode call sequence
//! (`schema.validate(&val)?; val.encode(...)`) and `avro/io.py`'s
//! `write_data`/`write_union`/`write_record`/`write_array`/`write_map`. Unlike
//! the Python original's blanket `except Exception` in `write_data` (folding
//! every failure into one "Unknown type" message), the exhaustive match below
//! lets the compiler guarantee every `Variant` arm is handled and lets each
//! failure report what it actually is.

use crate::codec::Encoder;
use crate::error::{AvroError, AvroResult};
use crate::schema::{Registry, Schema, Variant};
use crate::validate::validate;
use crate::value::Value;
use std::io::Write;

/// Writes `Value`s to the wire per a given writer schema, validating each
/// one against the schema before encoding it.
pub struct DatumWriter;

impl Default for DatumWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatumWriter {
    /// Creates a stateless datum writer.
    pub fn new() -> Self {
        DatumWriter
    }

    /// Validates `value` against `schema` and writes it to `encoder`.
    pub fn write<W: Write>(
        &self,
        value: &Value,
        schema: &Schema,
        encoder: &mut Encoder<W>,
    ) -> AvroResult<()> {
        let (variant, cxt) = (schema.variant(), schema.registry());
        if !validate(variant, value, cxt) {
            return Err(AvroError::AvroType {
                expected: variant.type_name().to_string(),
                found: type_name_of(value).to_string(),
            });
        }
        self.write_data(value, variant, cxt, encoder)
    }

    fn write_data<W: Write>(
        &self,
        value: &Value,
        schema: &Variant,
        cxt: &Registry,
        encoder: &mut Encoder<W>,
    ) -> AvroResult<()> {
        match schema {
            Variant::Null => encoder.write_null(),
            Variant::Boolean => encoder.write_boolean(value.as_bool().unwrap()),
            Variant::Int => encoder.write_int(coerce_i32(value)),
            Variant::Long => encoder.write_long(coerce_i64(value)),
            Variant::Float => encoder.write_float(coerce_f32(value)),
            Variant::Double => encoder.write_double(coerce_f64(value)),
            Variant::Bytes => encoder.write_bytes(coerce_bytes(value)),
            Variant::Str => encoder.write_utf8(coerce_str(value)),

            Variant::Fixed { .. } => encoder.write_fixed(value.as_bytes().unwrap()),

            Variant::Enum { symbols, .. } => {
                let sym = value.as_str().unwrap();
                let idx = symbols
                    .iter()
                    .position(|s| s == sym)
                    .ok_or_else(|| AvroError::Encoding(format!("unknown enum symbol `{}`", sym)))?;
                encoder.write_int(idx as i32)
            }

            Variant::Array { items } => {
                let arr = value.as_array().unwrap();
                if !arr.is_empty() {
                    encoder.write_long(arr.len() as i64)?;
                    for item in arr {
                        self.write_data(item, items, cxt, encoder)?;
                    }
                }
                encoder.write_long(0)
            }

            Variant::Map { values } => {
                let map = match value {
                    Value::Map(m) => m,
                    _ => unreachable!("validate guarantees Value::Map for Variant::Map"),
                };
                if !map.is_empty() {
                    encoder.write_long(map.len() as i64)?;
                    for (k, v) in map {
                        encoder.write_utf8(k)?;
                        self.write_data(v, values, cxt, encoder)?;
                    }
                }
                encoder.write_long(0)
            }

            Variant::Record { fields, .. } | Variant::Error { fields, .. } => {
                let rec = value.as_record().unwrap();
                for (fname, field) in fields {
                    match rec.get(fname) {
                        Some(v) => self.write_data(v, &field.ty, cxt, encoder)?,
                        None => {
                            let default = field.default.as_ref().ok_or_else(|| {
                                AvroError::FieldMissing(fname.clone())
                            })?;
                            let reified = crate::reader::reify_default(default, &field.ty, cxt)?;
                            self.write_data(&reified, &field.ty, cxt, encoder)?;
                        }
                    }
                }
                Ok(())
            }

            Variant::Union { variants } => {
                // `value` here is the unwrapped payload (a union never nests
                // inside itself); find the first branch it validates against.
                let (idx, branch) = variants
                    .iter()
                    .enumerate()
                    .find(|(_, v)| validate(v, value, cxt))
                    .ok_or(AvroError::NotFoundInUnion)?;
                encoder.write_long(idx as i64)?;
                self.write_data(value, branch, cxt, encoder)
            }

            Variant::Named(name) => {
                let resolved = cxt
                    .get(name)
                    .ok_or_else(|| AvroError::NamedSchemaNotFound(name.clone()))?;
                let resolved = resolved.clone();
                self.write_data(value, &resolved, cxt, encoder)
            }
        }
    }
}

fn type_name_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Int(_) => "int",
        Value::Long(_) => "long",
        Value::Float(_) => "float",
        Value::Double(_) => "double",
        Value::Bytes(_) => "bytes",
        Value::Str(_) => "string",
        Value::Fixed(_) => "fixed",
        Value::Enum(_) => "enum",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Record(_) => "record",
        Value::Union(_) => "union",
    }
}

fn coerce_i32(value: &Value) -> i32 {
    match value {
        Value::Int(i) => *i,
        other => panic!("validate() should have rejected {:?} for an int schema", other),
    }
}

fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Long(i) => *i,
        Value::Int(i) => *i as i64,
        other => panic!("validate() should have rejected {:?} for a long schema", other),
    }
}

fn coerce_f32(value: &Value) -> f32 {
    match value {
        Value::Float(f) => *f,
        Value::Int(i) => *i as f32,
        Value::Long(l) => *l as f32,
        other => panic!("validate() should have rejected {:?} for a float schema", other),
    }
}

fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Double(d) => *d,
        Value::Float(f) => *f as f64,
        Value::Int(i) => *i as f64,
        Value::Long(l) => *l as f64,
        other => panic!("validate() should have rejected {:?} for a double schema", other),
    }
}

fn coerce_bytes(value: &Value) -> &[u8] {
    match value {
        Value::Bytes(b) => b,
        other => panic!("validate() should have rejected {:?} for a bytes schema", other),
    }
}

fn coerce_str(value: &Value) -> &str {
    match value {
        Value::Str(s) => s,
        other => panic!("validate() should have rejected {:?} for a string schema", other),
    }
}
