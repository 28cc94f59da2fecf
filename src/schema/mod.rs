//! Parsing and in-memory representation of an Avro schema.
//! Schemas in Avro are written as JSON and can be loaded from a string or a
//! `.avsc` file.

pub mod common;
#[cfg(test)]
mod tests;
pub mod parser;
pub(crate) use parser::Registry;

use crate::error::{AvroError, AvroResult};
use crate::value::Value;
use common::{Field, Name};
use indexmap::IndexMap;
use serde_json::{self, Value as JsonValue};
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;

/// The recursive type tree backing a `Schema`. One arm per Avro type tag, plus
/// `Named` — an indirection resolved through a `Registry` — for recursive or
/// forward-referenced record/enum/fixed schemas.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Variant {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    Str,
    Record {
        name: Name,
        fields: IndexMap<String, Field>,
    },
    Error {
        name: Name,
        fields: IndexMap<String, Field>,
    },
    Fixed {
        name: Name,
        size: usize,
    },
    Enum {
        name: Name,
        symbols: Vec<String>,
    },
    Map {
        values: Box<Variant>,
    },
    Array {
        items: Box<Variant>,
    },
    Union {
        variants: Vec<Variant>,
    },
    Named(String),
}

impl Variant {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Variant::Null => "null",
            Variant::Boolean => "boolean",
            Variant::Int => "int",
            Variant::Long => "long",
            Variant::Float => "float",
            Variant::Double => "double",
            Variant::Bytes => "bytes",
            Variant::Str => "string",
            Variant::Record { .. } => "record",
            Variant::Error { .. } => "error",
            Variant::Fixed { .. } => "fixed",
            Variant::Enum { .. } => "enum",
            Variant::Map { .. } => "map",
            Variant::Array { .. } => "array",
            Variant::Union { .. } => "union",
            Variant::Named(_) => "named",
        }
    }

    pub(crate) fn get_named_mut(&mut self) -> Option<&mut Name> {
        match self {
            Variant::Record { name, .. }
            | Variant::Error { name, .. }
            | Variant::Fixed { name, .. }
            | Variant::Enum { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A parsed Avro schema, ready to drive validation, resolution, reading and writing.
#[derive(Debug)]
pub struct Schema {
    inner: JsonValue,
    pub(crate) cxt: Registry,
    pub(crate) variant: Variant,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.variant == other.variant
    }
}

impl std::str::FromStr for Schema {
    type Err = AvroError;

    /// Parses an Avro schema from a JSON string. Use Rust's raw string syntax
    /// (`r##"..."##`) to pass schema text containing quotes.
    fn from_str(schema: &str) -> Result<Self, Self::Err> {
        let schema_json =
            serde_json::from_str(schema).map_err(|e| AvroError::SchemaParseErr(e.into()))?;
        Schema::parse_imp(schema_json)
    }
}

impl Schema {
    /// Parses an Avro schema from a JSON schema file.
    pub fn from_path<P: AsRef<Path> + Debug>(path: P) -> AvroResult<Self> {
        let schema_file = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(AvroError::SchemaParseErr)?;
        let value =
            serde_json::from_reader(schema_file).map_err(|e| AvroError::SchemaParseErr(e.into()))?;
        Schema::parse_imp(value)
    }

    fn parse_imp(schema_json: JsonValue) -> AvroResult<Self> {
        let mut registry = Registry::new();
        let variant = registry.parse_schema(&schema_json, None)?;
        Ok(Schema {
            inner: schema_json,
            cxt: registry,
            variant,
        })
    }

    pub(crate) fn variant(&self) -> &Variant {
        &self.variant
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.cxt
    }

    /// Validates a value against this schema's root type.
    #[inline(always)]
    pub fn validate(&self, value: &Value) -> bool {
        crate::validate::validate(&self.variant, value, &self.cxt)
    }
}
