use super::common::{Field, Name};
use super::Variant;
use crate::error::io_err;
use crate::error::AvroError;
use crate::schema::common::validate_name;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// Wraps a `{ fullname -> schema }` lookup table used both while parsing (to
/// resolve named references forward and backward) and afterwards (to resolve
/// `Variant::Named` indirections during validation, resolution, reading and
/// writing).
#[derive(Debug, Clone)]
pub(crate) struct Registry {
    cxt: HashMap<String, Variant>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            cxt: HashMap::new(),
        }
    }

    pub(crate) fn get<'a>(&'a self, name: &str) -> Option<&'a Variant> {
        self.cxt.get(name)
    }

    pub(crate) fn parse_schema(
        &mut self,
        value: &JsonValue,
        enclosing_namespace: Option<&str>,
    ) -> Result<Variant, AvroError> {
        match value {
            JsonValue::Object(ref schema) => self.parse_object(schema, enclosing_namespace),
            JsonValue::String(ref schema) => self.parse_primitive(schema, enclosing_namespace),
            JsonValue::Array(ref schema) => self.parse_union(schema, enclosing_namespace),
            _ => Err(AvroError::UnknownSchema),
        }
    }

    fn parse_union(
        &mut self,
        schema: &[JsonValue],
        enclosing_namespace: Option<&str>,
    ) -> Result<Variant, AvroError> {
        let mut union_schema = vec![];
        for s in schema {
            let parsed_schema = self.parse_schema(s, enclosing_namespace)?;
            match parsed_schema {
                Variant::Union { .. } => {
                    return Err(AvroError::DuplicateSchemaInUnion);
                }
                _ => {
                    if union_schema.contains(&parsed_schema) {
                        return Err(AvroError::DuplicateSchemaInUnion);
                    } else {
                        union_schema.push(parsed_schema);
                    }
                }
            }
        }
        Ok(Variant::Union {
            variants: union_schema,
        })
    }

    fn get_fullname(&self, name: &str, enclosing_namespace: Option<&str>) -> String {
        if let Some(namespace) = enclosing_namespace {
            format!("{}.{}", namespace, name)
        } else {
            name.to_string()
        }
    }

    fn parse_primitive(
        &mut self,
        schema: &str,
        enclosing_namespace: Option<&str>,
    ) -> Result<Variant, AvroError> {
        match schema {
            "null" => Ok(Variant::Null),
            "boolean" => Ok(Variant::Boolean),
            "int" => Ok(Variant::Int),
            "long" => Ok(Variant::Long),
            "double" => Ok(Variant::Double),
            "float" => Ok(Variant::Float),
            "bytes" => Ok(Variant::Bytes),
            "string" => Ok(Variant::Str),
            other if !other.is_empty() => {
                let name = self.get_fullname(other, enclosing_namespace);
                if self.cxt.contains_key(&name) {
                    Ok(Variant::Named(name))
                } else {
                    Err(AvroError::SchemaParseErr(io_err(&format!(
                        "named schema `{}` must be defined before use",
                        other
                    ))))
                }
            }
            _ => Err(AvroError::InvalidPrimitiveSchema),
        }
    }

    fn parse_record_fields(
        &mut self,
        fields: &[serde_json::Value],
        enclosing_namespace: Option<&str>,
    ) -> Result<IndexMap<String, Field>, AvroError> {
        let mut fields_parsed = IndexMap::with_capacity(fields.len());
        for field_obj in fields {
            match field_obj {
                JsonValue::Object(o) => {
                    let name = o
                        .get("name")
                        .and_then(|a| a.as_str())
                        .ok_or(AvroError::RecordNameNotFound)?;

                    let ty: &JsonValue = o.get("type").ok_or(AvroError::RecordTypeNotFound)?;
                    let mut ty = self.parse_schema(ty, enclosing_namespace)?;

                    // if ty is a named type, attach the enclosing namespace when it
                    // didn't bring its own.
                    if let Some(name) = ty.get_named_mut() {
                        if name.namespace().is_none() {
                            if let Some(namespace) = enclosing_namespace {
                                name.set_namespace(namespace)?;
                            }
                        }
                    }

                    // Defaults are kept as raw JSON and reified lazily by the
                    // default-value reifier, once the full registry is built.
                    let default = o.get("default").cloned();

                    if fields_parsed.contains_key(name) {
                        return Err(AvroError::DuplicateField);
                    }

                    fields_parsed.insert(name.to_string(), Field::new(name, ty, default)?);
                }
                _ => return Err(AvroError::InvalidRecordFieldType),
            }
        }

        Ok(fields_parsed)
    }

    fn parse_object(
        &mut self,
        value: &Map<String, JsonValue>,
        enclosing_namespace: Option<&str>,
    ) -> Result<Variant, AvroError> {
        match value.get("type") {
            Some(&JsonValue::String(ref s)) if s == "record" || s == "error" => {
                let rec_name = Name::from_json(value, enclosing_namespace)?;

                // Insert a named reference first, to support recursive definitions.
                self.cxt
                    .insert(rec_name.to_string(), Variant::Named(rec_name.to_string()));

                let fields = if let Some(JsonValue::Array(ref fields_vec)) = value.get("fields") {
                    fields_vec
                } else {
                    return Err(AvroError::ExpectedFieldsJsonArray);
                };

                let field_namespace = if rec_name.namespace().is_some() {
                    rec_name.namespace()
                } else {
                    enclosing_namespace
                };
                let fields = self.parse_record_fields(fields, field_namespace)?;

                let rec = if s == "error" {
                    Variant::Error {
                        name: rec_name.clone(),
                        fields,
                    }
                } else {
                    Variant::Record {
                        name: rec_name.clone(),
                        fields,
                    }
                };

                let rec_for_registry = rec.clone();
                let rec_name = rec_name.to_string();

                if let Some(Variant::Named(_)) = self.cxt.get(&rec_name) {
                    self.cxt.insert(rec_name, rec_for_registry);
                } else {
                    return Err(AvroError::DuplicateSchema);
                }

                Ok(rec)
            }
            Some(&JsonValue::String(ref s)) if s == "enum" => {
                let name = Name::from_json(value, enclosing_namespace)?;
                let mut symbols = vec![];

                if let Some(v) = value.get("symbols") {
                    match v {
                        JsonValue::Array(sym) => {
                            for v in sym {
                                let symbol = v.as_str().ok_or(AvroError::EnumSymbolParseErr)?;
                                validate_name(0, symbol)?;
                                symbols.push(symbol.to_string());
                            }
                        }
                        other => {
                            return Err(AvroError::EnumParseErr(format!("{:?}", other)));
                        }
                    }
                } else {
                    return Err(AvroError::EnumSymbolsMissing);
                }

                let name_str = name.fullname();
                let enum_schema = Variant::Enum { name, symbols };
                self.cxt.insert(name_str, enum_schema.clone());

                Ok(enum_schema)
            }
            Some(&JsonValue::String(ref s)) if s == "array" => {
                let items_schema = value.get("items").ok_or_else(|| {
                    AvroError::SchemaParseErr(io_err("array schema must have `items` field defined"))
                })?;
                let parsed_items = self.parse_schema(items_schema, enclosing_namespace)?;
                Ok(Variant::Array {
                    items: Box::new(parsed_items),
                })
            }
            Some(&JsonValue::String(ref s)) if s == "map" => {
                let items_schema = value.get("values").ok_or_else(|| {
                    AvroError::SchemaParseErr(io_err("map schema must have `values` field defined"))
                })?;
                let parsed_items = self.parse_schema(items_schema, enclosing_namespace)?;
                Ok(Variant::Map {
                    values: Box::new(parsed_items),
                })
            }
            Some(&JsonValue::String(ref s)) if s == "fixed" => {
                let name = Name::from_json(value, enclosing_namespace)?;
                let size = value.get("size").ok_or(AvroError::FixedSizeNotFound)?;
                let name_str = name.fullname();

                let fixed_schema = Variant::Fixed {
                    name,
                    size: size.as_u64().ok_or(AvroError::FixedSizeNotNumber)? as usize,
                };

                self.cxt.insert(name_str, fixed_schema.clone());

                Ok(fixed_schema)
            }
            Some(JsonValue::String(ref s)) if s == "null" => Ok(Variant::Null),
            Some(JsonValue::String(ref s)) if s == "boolean" => Ok(Variant::Boolean),
            Some(JsonValue::String(ref s)) if s == "int" => Ok(Variant::Int),
            Some(JsonValue::String(ref s)) if s == "long" => Ok(Variant::Long),
            Some(JsonValue::String(ref s)) if s == "float" => Ok(Variant::Float),
            Some(JsonValue::String(ref s)) if s == "double" => Ok(Variant::Double),
            Some(JsonValue::String(ref s)) if s == "bytes" => Ok(Variant::Bytes),
            Some(JsonValue::String(ref s)) if s == "string" => Ok(Variant::Str),
            _other => Err(AvroError::SchemaParseFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::Field;
    use crate::schema::Name;
    use crate::schema::Variant;
    use crate::Schema;
    use indexmap::IndexMap;
    use std::str::FromStr;

    #[test]
    fn schema_parse_keeps_defaults_as_raw_json() {
        let schema = Schema::from_str(
            r##"{
                "type": "record",
                "name": "Can",
                "namespace": "com.avrow",
                "fields" : [
                    {
                        "name": "next",
                        "type": ["null", "Can"]
                    },
                    {
                        "name": "value",
                        "type": "long",
                        "default": 1
                    }
                ]
            }"##,
        )
        .unwrap();

        let mut fields = IndexMap::new();
        let f1 = Field::new("value", Variant::Long, Some(serde_json::json!(1))).unwrap();
        let f2 = Field::new(
            "next",
            Variant::Union {
                variants: vec![Variant::Null, Variant::Named("com.avrow.Can".to_string())],
            },
            None,
        )
        .unwrap();
        fields.insert("value".to_string(), f1);
        fields.insert("next".to_string(), f2);

        let mut name = Name::new("Can").unwrap();
        name.set_namespace("com.avrow").unwrap();

        let s = Variant::Record { name, fields };

        assert_eq!(&s, schema.variant());
    }

    #[test]
    fn nested_record_fields_parses_properly_with_fullnames() {
        let schema = Schema::from_str(
            r##"{
            "name": "longlist",
            "namespace": "com.some",
            "type":"record",
            "fields": [
                {"name": "magic", "type": {"type": "fixed", "name": "magic", "size": 4, "namespace": "com.bar"}
                },
                {"name": "inner_rec", "type": {"type": "record", "name": "inner_rec", "fields": [
                    {
                        "name": "test",
                        "type": {"type": "fixed", "name":"hello", "size":5}
                    }
                ]}}
            ]
        }"##,
        )
        .unwrap();

        assert!(schema.registry().get("com.bar.magic").is_some());
        assert!(schema.registry().get("com.some.hello").is_some());
        assert!(schema.registry().get("com.some.longlist").is_some());
        assert!(schema.registry().get("com.some.inner_rec").is_some());
    }

    #[test]
    fn error_type_parses_like_record() {
        let schema = Schema::from_str(
            r##"{"type": "error", "name": "Boom", "fields": [{"name": "msg", "type": "string"}]}"##,
        )
        .unwrap();
        assert!(matches!(schema.variant(), Variant::Error { .. }));
    }
}
