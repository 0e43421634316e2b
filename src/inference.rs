//! Schema inference from a single example instance.
//!
//! Walks an object-rooted value and describes its shape:
//! - objects recurse into nested `Object` nodes;
//! - lists collect the distinct element shapes: one shape gives `ListOf(shape)`,
//!   several give `ListOf(Union(shapes))`, and `[]` gives the empty
//!   `ListOf(Union(∅))`, which only another empty list satisfies;
//! - everything else becomes `Scalar(kind)`.
//!
//! By construction the example always passes a strict-equality check against
//! the schema inferred from it.
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::schema::{ScalarType, SchemaNode};
use crate::value::{Instance, ValueKind};

// ------------------------------- Front API -------------------------------- //

/// Infer a schema from an instance given as text or as a parsed value.
pub fn create_schema<'a>(instance: impl Into<Instance<'a>>) -> Result<SchemaNode> {
    let root = instance.into().load()?;
    infer(&root)
}

/// Infer a schema from an object-rooted value.
pub fn infer(instance: &Value) -> Result<SchemaNode> {
    match instance {
        Value::Object(map) => Ok(infer_object(map)),
        other => Err(ValidationError::invalid_schema(
            "",
            format!("cannot infer a schema from a `{}` root; expected an object", ValueKind::of(other)),
        )),
    }
}

// ------------------------------ Observe ---------------------------------- //

pub fn infer_value(v: &Value) -> SchemaNode {
    match v {
        Value::Object(map) => infer_object(map),
        Value::Array(xs) => infer_list(xs),
        // scalars always classify
        scalar => SchemaNode::Scalar(ScalarType::of(scalar).unwrap_or(ScalarType::Null)),
    }
}

fn infer_object(map: &Map<String, Value>) -> SchemaNode {
    SchemaNode::Object(map.iter().map(|(k, v)| (k.clone(), infer_value(v))).collect())
}

fn infer_list(xs: &[Value]) -> SchemaNode {
    SchemaNode::list_of(SchemaNode::union(xs.iter().map(infer_value)))
}

// ------------------------------- Tests ------------------------------------ //
