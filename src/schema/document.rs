//! JSON schema documents.
//!
//! ```json
//! {
//!   "name": "str",
//!   "marks": { "english": "float" },
//!   "badges": ["str"],
//!   "random": [{ "$union": ["str", "int", "float"] }],
//!   "email": "@email"
//! }
//! ```
//!
//! A one-element array types list elements, `{"$union": [...]}` is a union
//! and `"@name"` refers to a predicate in a [`PredicateRegistry`].
//!
//! Field names starting with `$` are written with one extra leading `$`
//! (`"$union"` as a field becomes `"$$union"`), and reading strips it again.
use serde_json::{Map, Value};

use super::{PredicateRegistry, ScalarType, SchemaNode};
use crate::error::{join_index, join_key, Result, ValidationError};

pub const UNION_KEY: &str = "$union";
pub const PREDICATE_PREFIX: char = '@';

impl SchemaNode {
    /// Parse a schema document from JSON text.
    pub fn from_json_str(src: &str, registry: &PredicateRegistry) -> Result<Self> {
        let doc: Value = serde_json::from_str(src)?;
        Self::from_json(&doc, registry)
    }

    /// Build a schema tree from a parsed document. The root must be an object.
    pub fn from_json(doc: &Value, registry: &PredicateRegistry) -> Result<Self> {
        match doc {
            Value::Object(map) if !is_union_marker(map) => parse_node(doc, "", registry),
            _ => Err(ValidationError::invalid_schema("", "schema root must be an object shape")),
        }
    }

    /// Canonical document form of this node.
    pub fn to_json(&self) -> Value {
        match self {
            SchemaNode::Scalar(t) => Value::from(t.as_str()),
            SchemaNode::Object(fields) => Value::Object(
                fields.iter().map(|(k, v)| (escape_key(k), v.to_json())).collect(),
            ),
            SchemaNode::ListOf(inner) => Value::Array(vec![inner.to_json()]),
            SchemaNode::Union(members) => {
                let mut o = Map::new();
                o.insert(UNION_KEY.to_string(), members.iter().map(SchemaNode::to_json).collect());
                Value::Object(o)
            }
            SchemaNode::Predicate(p) => Value::from(format!("{PREDICATE_PREFIX}{}", p.name())),
        }
    }
}

fn is_union_marker(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.contains_key(UNION_KEY)
}

fn escape_key(key: &str) -> String {
    if key.starts_with('$') { format!("${key}") } else { key.to_string() }
}

fn unescape_key(key: &str) -> &str {
    if key.starts_with("$$") { &key[1..] } else { key }
}

fn parse_node(v: &Value, path: &str, registry: &PredicateRegistry) -> Result<SchemaNode> {
    match v {
        Value::String(tag) => parse_tag(tag, path, registry),
        Value::Object(map) if is_union_marker(map) => {
            let Some(Value::Array(members)) = map.get(UNION_KEY) else {
                return Err(ValidationError::invalid_schema(path, "`$union` must hold an array of schemas"));
            };
            let members = members
                .iter()
                .enumerate()
                .map(|(i, m)| parse_node(m, &join_index(path, i), registry))
                .collect::<Result<Vec<_>>>()?;
            Ok(SchemaNode::union(members))
        }
        Value::Object(map) => {
            let fields = map
                .iter()
                .map(|(k, sub)| -> Result<(String, SchemaNode)> {
                    let k = unescape_key(k);
                    Ok((k.to_string(), parse_node(sub, &join_key(path, k), registry)?))
                })
                .collect::<Result<indexmap::IndexMap<_, _>>>()?;
            Ok(SchemaNode::Object(fields))
        }
        Value::Array(items) => match items.as_slice() {
            [inner] => Ok(SchemaNode::list_of(parse_node(inner, &join_index(path, 0), registry)?)),
            _ => Err(ValidationError::invalid_schema(
                path,
                format!(
                    "list schema must contain exactly one element type, found {}; \
                     to accept multiple types use `{{\"{UNION_KEY}\": [...]}}`",
                    items.len()
                ),
            )),
        },
        other => Err(ValidationError::invalid_schema(
            path,
            format!("expected a type tag, object, list or predicate, found `{other}`"),
        )),
    }
}

fn parse_tag(tag: &str, path: &str, registry: &PredicateRegistry) -> Result<SchemaNode> {
    if let Some(name) = tag.strip_prefix(PREDICATE_PREFIX) {
        return registry
            .get(name)
            .cloned()
            .map(SchemaNode::Predicate)
            .ok_or_else(|| ValidationError::invalid_schema(path, format!("unknown predicate `{name}`")));
    }
    ScalarType::from_tag(tag)
        .map(SchemaNode::Scalar)
        .ok_or_else(|| ValidationError::invalid_schema(path, format!("unknown type tag `{tag}`")))
}
