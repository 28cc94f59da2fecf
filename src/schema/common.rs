// This module contains definitions of types that are common across a subset of
// the Avro schema model: named-type naming rules, and record field definitions.

use crate::error::AvroError;
use crate::schema::Variant;
use serde_json::Value as JsonValue;
use std::fmt::{self, Display};
use std::str::FromStr;

///////////////////////////////////////////////////////////////////////////////
// Name implementation for named types: record, fixed, enum
///////////////////////////////////////////////////////////////////////////////

pub(crate) fn validate_name(idx: usize, name: &str) -> Result<(), AvroError> {
    if name.contains('.')
        || (name.starts_with(|a: char| a.is_ascii_digit()) && idx == 0)
        || name.is_empty()
        || !name.chars().any(|a| a.is_ascii_alphanumeric() || a == '_')
    {
        Err(AvroError::InvalidName)
    } else {
        Ok(())
    }
}

// Follows the grammar: <empty> | <name>[(<dot><name>)*]
pub(crate) fn validate_namespace(s: &str) -> Result<(), AvroError> {
    for (i, n) in s.split('.').enumerate() {
        validate_name(i, n).map_err(|_| AvroError::InvalidNamespace)?;
    }
    Ok(())
}

/// Represents the `fullname` attribute of a named Avro type (record, fixed, enum).
#[derive(Debug, Clone, Eq, PartialOrd, Ord)]
pub struct Name {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
}

impl Name {
    // Creates a new name with validation. Extracts the namespace if a dot is
    // present in `name`; subsequent calls to `set_namespace` then become a noop.
    pub(crate) fn new(name: &str) -> Result<Self, AvroError> {
        let mut namespace = None;
        let name = if name.contains('.') {
            validate_namespace(name)?;
            let idx = name.rfind('.').unwrap();
            namespace = Some(name[..idx].to_string());
            let name = &name[idx + 1..];
            validate_name(0, name)?;
            name
        } else {
            validate_name(0, name)?;
            name
        };

        Ok(Self {
            name: name.to_string(),
            namespace,
        })
    }

    pub(crate) fn from_json(
        json: &serde_json::map::Map<String, JsonValue>,
        enclosing_namespace: Option<&str>,
    ) -> Result<Self, AvroError> {
        let mut name = if let Some(JsonValue::String(ref s)) = json.get("name") {
            Name::new(s)
        } else {
            return Err(AvroError::NameParseFailed);
        }?;

        // If the name field itself has a dot, that is a fullname and any
        // namespace field is ignored. Otherwise fall back to the schema's own
        // `namespace` field, then to the enclosing namespace.
        if name.namespace.is_none() {
            if let Some(JsonValue::String(s)) = json.get("namespace") {
                validate_namespace(s)?;
                name.set_namespace(s)?;
            } else if let Some(a) = enclosing_namespace {
                validate_namespace(a)?;
                name.set_namespace(a)?;
            }
        }

        Ok(name)
    }

    pub(crate) fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub(crate) fn set_namespace(&mut self, namespace: &str) -> Result<(), AvroError> {
        if namespace.is_empty() {
            return Ok(());
        }
        validate_namespace(namespace)?;
        if self.namespace.is_none() {
            self.namespace = Some(namespace.to_string());
        }
        Ok(())
    }

    pub(crate) fn fullname(&self) -> String {
        match &self.namespace {
            Some(n) if !n.is_empty() => format!("{}.{}", n, self.name),
            _ => self.name.to_string(),
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}

impl FromStr for Name {
    type Err = AvroError;

    fn from_str(s: &str) -> Result<Self, AvroError> {
        Name::new(s)
    }
}

impl std::convert::TryFrom<&str> for Name {
    type Error = AvroError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Name::new(value)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.fullname() == other.fullname()
    }
}

///////////////////////////////////////////////////////////////////////////////
// Record field definition.
///////////////////////////////////////////////////////////////////////////////

/// A single field of a `record`/`error`/`request` schema.
///
/// `default` is kept in its raw JSON-shaped form exactly as it appeared in the
/// schema text; it is only reified into a concrete `Value` on demand, by the
/// default-value reifier, at the point a reader actually needs it. This avoids
/// requiring every named type to already be fully resolved at schema-parse
/// time, which matters for self-referencing records.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) ty: Variant,
    pub(crate) has_default: bool,
    pub(crate) default: Option<JsonValue>,
}

impl std::cmp::PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl Field {
    pub(crate) fn new(
        name: &str,
        ty: Variant,
        default: Option<JsonValue>,
    ) -> Result<Self, AvroError> {
        validate_name(0, name)?;
        Ok(Field {
            name: name.to_string(),
            ty,
            has_default: default.is_some(),
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::validate_namespace;
    use super::Name;

    #[test]
    fn name_starts_with_number_is_invalid() {
        assert!(Name::new("2org.apache.avro").is_err());
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        let mut name = Name::new("org.apache.avro").unwrap();
        assert!(name.set_namespace("23").is_err());
    }

    #[test]
    fn name_with_separate_namespace() {
        let mut name = Name::new("hello").unwrap();
        name.set_namespace("org.foo").unwrap();
        assert_eq!("org.foo.hello", name.fullname());
    }

    #[test]
    fn name_contains_dots() {
        let name = Name::new("org.apache.avro").unwrap();
        assert_eq!("avro", name.name);
        assert_eq!("org.apache.avro", name.fullname());
    }

    #[test]
    fn fullname_with_empty_namespace() {
        let mut name = Name::new("org.apache.avro").unwrap();
        name.set_namespace("").unwrap();
        assert_eq!("org.apache.avro", name.fullname());
    }

    #[test]
    fn multiple_dots_is_invalid_namespace() {
        assert!(validate_namespace("some.namespace..foo").is_err());
    }

    #[test]
    fn name_has_dot_and_namespace_present() {
        let json_str = r##"{"name":"my.longlist","namespace":"com.some","type":"record"}"##;
        let json: serde_json::Value = serde_json::from_str(json_str).unwrap();
        let name = Name::from_json(json.as_object().unwrap(), None).unwrap();
        assert_eq!(name.name, "longlist");
        assert_eq!(name.namespace, Some("my".to_string()));
        assert_eq!(name.fullname(), "my.longlist");
    }

    #[test]
    fn name_no_dot_and_namespace_present() {
        let json_str = r##"{"name":"longlist","namespace":"com.some","type":"record"}"##;
        let json: serde_json::Value = serde_json::from_str(json_str).unwrap();
        let name = Name::from_json(json.as_object().unwrap(), None).unwrap();
        assert_eq!(name.name, "longlist");
        assert_eq!(name.namespace, Some("com.some".to_string()));
        assert_eq!(name.fullname(), "com.some.longlist");
    }
}
