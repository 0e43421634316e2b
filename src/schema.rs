//! Schema nodes: the closed vocabulary schemas are built from.
//!
//! - `Scalar` matches one primitive kind (ints and floats are distinct).
//! - `Object` is a nested shape; key order is kept but never matters for equality.
//! - `ListOf` types every element of a list.
//! - `Union` is satisfied by any one member; equality ignores member order.
//! - `Predicate` wraps a `Value -> bool` check.
pub mod document;
pub mod predicate;

use std::fmt;
use indexmap::IndexMap;
use serde_json::Value;

use crate::value::ValueKind;

pub use predicate::{Predicate, PredicateRegistry};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    Null,
    Bool,
    Int,
    Float,
    String,
}

#[derive(Debug, Clone)]
pub enum SchemaNode {
    Scalar(ScalarType),
    Object(IndexMap<String, SchemaNode>),
    ListOf(Box<SchemaNode>),
    /// Prefer [`SchemaNode::union`], which drops duplicates and collapses a
    /// single member. Equality treats `Union([x])` and `x` as the same node.
    Union(Vec<SchemaNode>),
    Predicate(Predicate),
}

// ————————————————————————————————————————————————————————————————————————————
// SCALARS
// ————————————————————————————————————————————————————————————————————————————

impl ScalarType {
    /// Scalar kind of a value; `None` for lists and objects.
    pub fn of(v: &Value) -> Option<Self> {
        match ValueKind::of(v) {
            ValueKind::Null => Some(ScalarType::Null),
            ValueKind::Bool => Some(ScalarType::Bool),
            ValueKind::Int => Some(ScalarType::Int),
            ValueKind::Float => Some(ScalarType::Float),
            ValueKind::String => Some(ScalarType::String),
            ValueKind::List | ValueKind::Object => None,
        }
    }

    pub fn matches(self, v: &Value) -> bool {
        Self::of(v) == Some(self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Null => "null",
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::String => "str",
        }
    }

    /// Accepts the canonical tags plus their JSON-Schema-ish spellings.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "null" => Some(ScalarType::Null),
            "bool" | "boolean" => Some(ScalarType::Bool),
            "int" | "integer" => Some(ScalarType::Int),
            "float" | "number" => Some(ScalarType::Float),
            "str" | "string" => Some(ScalarType::String),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// NODES
// ————————————————————————————————————————————————————————————————————————————

impl SchemaNode {
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SchemaNode)>,
    {
        SchemaNode::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list_of(inner: SchemaNode) -> Self {
        SchemaNode::ListOf(Box::new(inner))
    }

    /// Build a union, dropping duplicate members and collapsing a single
    /// effective member to itself. Member order is first-seen order.
    ///
    /// An empty member list stays an (unsatisfiable) empty union.
    pub fn union<I>(members: I) -> Self
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        let mut out: Vec<SchemaNode> = Vec::new();
        for m in members {
            // nested unions flatten into the outer set
            let parts = match m {
                SchemaNode::Union(inner) => inner,
                other => vec![other],
            };
            for p in parts {
                if !out.contains(&p) { out.push(p); }
            }
        }
        if out.len() == 1 {
            out.remove(0)
        } else {
            SchemaNode::Union(out)
        }
    }

    pub fn predicate(p: Predicate) -> Self {
        SchemaNode::Predicate(p)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, SchemaNode::Object(_))
    }

    /// True if any node in the tree is a predicate.
    pub fn has_predicates(&self) -> bool {
        match self {
            SchemaNode::Scalar(_) => false,
            SchemaNode::Object(fields) => fields.values().any(SchemaNode::has_predicates),
            SchemaNode::ListOf(inner) => inner.has_predicates(),
            SchemaNode::Union(members) => members.iter().any(SchemaNode::has_predicates),
            SchemaNode::Predicate(_) => true,
        }
    }
}

impl From<ScalarType> for SchemaNode {
    fn from(t: ScalarType) -> Self { SchemaNode::Scalar(t) }
}

impl PartialEq for SchemaNode {
    fn eq(&self, other: &Self) -> bool {
        use SchemaNode::*;
        match (self, other) {
            (Scalar(a), Scalar(b)) => a == b,
            // IndexMap equality is order-insensitive
            (Object(a), Object(b)) => a == b,
            (ListOf(a), ListOf(b)) => a == b,
            (Union(a), Union(b)) => {
                a.iter().all(|m| b.contains(m)) && b.iter().all(|m| a.contains(m))
            }
            // a union of one effective member is that member
            (Union(a), b) | (b, Union(a)) => !a.is_empty() && a.iter().all(|m| m == b),
            (Predicate(a), Predicate(b)) => a == b,
            _ => false,
        }
    }
}

/// Short human-readable rendering, used in mismatch diagnostics.
impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaNode::Scalar(t) => write!(f, "{t}"),
            SchemaNode::Object(_) => f.write_str("object"),
            SchemaNode::ListOf(inner) => write!(f, "[{inner}]"),
            SchemaNode::Union(members) if members.is_empty() => f.write_str("never"),
            SchemaNode::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 { f.write_str(" | ")?; }
                    write!(f, "{m}")?;
                }
                Ok(())
            }
            SchemaNode::Predicate(p) => write!(f, "@{}", p.name()),
        }
    }
}
