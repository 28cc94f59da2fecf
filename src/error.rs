#![allow(missing_docs)]

#[inline(always)]
pub(crate) fn io_err(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, msg)
}

pub type AvroResult<T> = Result<T, AvroError>;

/// Errors returned by this crate's codec, validator, matcher, reader and writer.
#[derive(thiserror::Error, Debug)]
pub enum AvroError {
    // --- wire-level codec errors ---
    #[error("read failed")]
    DecodeFailed(#[source] std::io::Error),
    #[error("write failed")]
    EncodeFailed(#[source] std::io::Error),
    #[error("unexpected end of input while decoding")]
    Truncated,
    #[error("malformed wire encoding: {0}")]
    Encoding(String),
    #[error("checksum mismatch: found {found:08x}, expected {expected:08x}")]
    ChecksumMismatch { found: u32, expected: u32 },

    // --- validator / datum-schema mismatch ---
    #[error("value does not match schema: expected {expected}, found {found}")]
    AvroType { expected: String, found: String },
    #[error("unions must not contain immediate union values")]
    NoImmediateUnion,
    #[error("no branch of union schema matches value")]
    NotFoundInUnion,

    // --- schema-resolution errors ---
    #[error("schema resolution failed: writer schema {writer} is not compatible with reader schema {reader}")]
    SchemaResolution { writer: String, reader: String },
    #[error("named schema `{0}` was not found in the schema registry")]
    NamedSchemaNotFound(String),
    #[error("field `{0}` has no default and was not present in the writer's data")]
    FieldMissing(String),
    #[error("unknown avro type tag: {0}")]
    UnknownType(String),

    // --- schema parsing errors ---
    #[error("failed to parse avro schema")]
    SchemaParseErr(#[source] std::io::Error),
    #[error("unknown schema, expecting a required `type` field in schema")]
    SchemaParseFailed,
    #[error("expecting `fields` key as a json array, found: {0}")]
    SchemaFieldParseErr(String),
    #[error("record schema is missing required field named `name`")]
    RecordNameNotFound,
    #[error("record schema is missing required field named `type`")]
    RecordTypeNotFound,
    #[error("expected record `fields` to be a json array")]
    ExpectedFieldsJsonArray,
    #[error("record's field json schema must be an object")]
    InvalidRecordFieldType,
    #[error("could not parse name from json value")]
    NameParseFailed,
    #[error("duplicate definition of named schema")]
    DuplicateSchema,
    #[error("duplicate field name in record schema")]
    DuplicateField,
    #[error("invalid default value for union: must reify against the first branch")]
    FailedDefaultUnion,
    #[error("invalid default value for given schema")]
    DefaultValueParse,
    #[error("failed to parse symbol from enum's `symbols` field")]
    EnumSymbolParseErr,
    #[error("enum schema must contain required `symbols` field")]
    EnumSymbolsMissing,
    #[error("fixed schema `size` field must be a number")]
    FixedSizeNotNumber,
    #[error("fixed schema `size` field missing")]
    FixedSizeNotFound,
    #[error("unions cannot have multiple schemas of the same type, or nested immediate unions")]
    DuplicateSchemaInUnion,
    #[error("expected the avro schema to be one of: json string, object, or array")]
    UnknownSchema,
    #[error("expected record field to be a json object, found {0}")]
    InvalidSchema(String),
    #[error("{0}")]
    InvalidDefaultValue(String),
    #[error("invalid type for {0}")]
    InvalidType(String),
    #[error("enum schema parsing failed, found: {0}")]
    EnumParseErr(String),
    #[error("primitive schema must be a string")]
    InvalidPrimitiveSchema,
    #[error("json must be an object for record")]
    ExpectedJsonObject,

    // --- naming rules ---
    #[error("namespaces must either be empty or follow the grammar <name>[(<dot><name>)*]")]
    InvalidNamespace,
    #[error("names must be [A-Za-z_] followed by [A-Za-z0-9_]*")]
    InvalidName,
}
