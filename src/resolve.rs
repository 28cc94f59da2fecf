//! The schema matcher: decides whether a reader's schema can consume data
//! written under a writer's schema, without touching any bytes.
//!
//! Grounded in `avro/io.py`'s `__match_schema__`/`match_schema` pair. The
//! cache is kept as an explicit struct field owned by whoever drives
//! resolution (`DatumReader`), rather than a process-global table as in the
//! Python original — this crate has no shared mutable state to protect, and a
//! fresh reader simply gets a fresh, empty cache.

use crate::schema::{Registry, Variant};
use std::collections::HashMap;

const MATCH_CACHE_MAX_LEN: usize = 20;

/// Schema-identity-keyed memoization for `match_schema`.
#[derive(Debug, Default)]
pub(crate) struct MatchCache {
    entries: HashMap<(usize, usize), bool>,
}

impl MatchCache {
    pub(crate) fn new() -> Self {
        MatchCache {
            entries: HashMap::new(),
        }
    }

    /// Returns whether `writer` can be read using `reader`, consulting (and
    /// populating) the cache keyed on the two schemas' identities.
    pub(crate) fn match_schema(
        &mut self,
        writer: &Variant,
        reader: &Variant,
        cxt: &Registry,
    ) -> bool {
        if std::ptr::eq(writer, reader) {
            return true;
        }

        let key = (writer as *const Variant as usize, reader as *const Variant as usize);

        if let Some(v) = self.entries.get(&key) {
            return *v;
        }

        if self.entries.len() > MATCH_CACHE_MAX_LEN {
            self.entries.clear();
        }

        let value = match_schema_impl(writer, reader, cxt);
        self.entries.insert(key, value);
        value
    }
}

fn fullname_of(v: &Variant) -> Option<String> {
    match v {
        Variant::Record { name, .. } | Variant::Fixed { name, .. } | Variant::Enum { name, .. } => {
            Some(name.fullname())
        }
        _ => None,
    }
}

const VALID_PROMOTIONS: &[(&str, &str)] = &[
    ("int", "long"),
    ("int", "float"),
    ("int", "double"),
    ("long", "float"),
    ("long", "double"),
    ("float", "double"),
];

fn match_schema_impl(writer: &Variant, reader: &Variant, cxt: &Registry) -> bool {
    let (writer, w_resolved) = resolve_named(writer, cxt);
    let (reader, r_resolved) = resolve_named(reader, cxt);
    let writer = w_resolved.as_deref().unwrap_or(writer);
    let reader = r_resolved.as_deref().unwrap_or(reader);

    let w_type = writer.type_name();
    let r_type = reader.type_name();

    if w_type == r_type {
        return match (writer, reader) {
            (Variant::Record { .. }, Variant::Record { .. })
            | (Variant::Error { .. }, Variant::Error { .. })
            | (Variant::Enum { .. }, Variant::Enum { .. }) => {
                fullname_of(writer) == fullname_of(reader)
            }
            (Variant::Fixed { name: wn, size: ws }, Variant::Fixed { name: rn, size: rs }) => {
                wn.fullname() == rn.fullname() && ws == rs
            }
            (Variant::Map { values: wv }, Variant::Map { values: rv }) => {
                wv.type_name() == rv.type_name()
            }
            (Variant::Array { items: wi }, Variant::Array { items: ri }) => {
                wi.type_name() == ri.type_name()
            }
            _ => true,
        };
    }

    if matches!(writer, Variant::Union { .. }) || matches!(reader, Variant::Union { .. }) {
        return true;
    }

    VALID_PROMOTIONS.contains(&(w_type, r_type))
}

fn resolve_named<'a>(v: &'a Variant, cxt: &'a Registry) -> (&'a Variant, Option<&'a Variant>) {
    if let Variant::Named(name) = v {
        (v, cxt.get(name))
    } else {
        (v, None)
    }
}
