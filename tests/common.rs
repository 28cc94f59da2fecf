#![allow(dead_code)]

use avro_codec_core::Schema;
use std::str::FromStr;

pub(crate) static PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

pub(crate) fn prim_schema(ty: &str) -> Schema {
    Schema::from_str(&format!(r#"{{"type": "{}"}}"#, ty)).unwrap()
}

pub(crate) struct MockSchema;

impl MockSchema {
    pub fn record() -> Schema {
        Schema::from_str(
            r#"
        {
            "type": "record",
            "name": "LongList",
            "fields" : [
              {"name": "value", "type": "long"},
              {"name": "next", "type": ["null", "LongList"]}
            ]
        }
        "#,
        )
        .unwrap()
    }

    pub fn record_with_default() -> Schema {
        Schema::from_str(
            r#"
        {
            "type": "record",
            "name": "LongList",
            "fields" : [
              {"name": "value", "type": "long"},
              {"name": "next", "type": ["null", "LongList"]},
              {"name": "other", "type":"long", "default": 1}
            ]
        }
        "#,
        )
        .unwrap()
    }
}
