//! A pure Rust implementation of the [Apache Avro binary wire format](https://avro.apache.org/docs/current/spec.html#binary_encoding).
//!
//! This crate handles the wire-level concerns of Avro: parsing a `.avsc`
//! schema, validating a value against it, resolving a writer's schema
//! against a reader's schema, and encoding/decoding values accordingly.
//! Container-file framing (the object-container-file header, block sync
//! markers, codec compression) is out of scope — bring your own framing atop
//! `Decoder`/`Encoder` if you need it.
//!
//! ## Example: round-tripping a record
//!
//!```rust
//! use avro_codec_core::{DatumReader, DatumWriter, Decoder, Encoder, Schema, Value, Record};
//! use std::str::FromStr;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Schema::from_str(r##"{
//!     "type": "record",
//!     "name": "Point",
//!     "fields": [
//!         {"name": "x", "type": "int"},
//!         {"name": "y", "type": "int"}
//!     ]
//! }"##)?;
//!
//! let mut record = Record::new();
//! record.insert("x".to_string(), Value::Int(3));
//! record.insert("y".to_string(), Value::Int(4));
//! let value = Value::Record(record);
//!
//! let mut buf = Vec::new();
//! DatumWriter::new().write(&value, &schema, &mut Encoder::new(&mut buf))?;
//!
//! let decoded = DatumReader::new().decode(&mut Decoder::new(buf.as_slice()), &schema)?;
//! assert_eq!(decoded, value);
//! # Ok(())
//! # }
//!```
//!
//! Schema evolution — decoding data written under one schema into the shape
//! of another — goes through `DatumReader::decode_with_resolution`.

#![deny(missing_docs)]
#![recursion_limit = "1024"]
#![deny(unused_must_use)]
#![deny(rust_2018_idioms)]
#![deny(warnings)]

mod codec;
mod error;
mod reader;
mod resolve;
mod schema;
mod validate;
mod value;
mod writer;

pub use codec::{Decoder, Encoder};
pub use error::{AvroError, AvroResult};
pub use reader::DatumReader;
pub use schema::Schema;
pub use value::{Map, Record, Value};
pub use writer::DatumWriter;
