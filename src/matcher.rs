//! Matching instances against schemas.
//!
//! Two modes share the same front half (size guard, then parse if the
//! instance is text):
//! - [`Validator::is_valid`] infers a schema from the instance and compares it
//!   structurally with the given one. Type-only; predicates never compare equal.
//! - [`Validator::validate`] walks instance and schema together, reconciling
//!   key sets first and then dispatching on each schema node. It stops at the
//!   first violation.
use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::error::{join_index, join_key, Result, ValidationError};
use crate::guard::check_size;
use crate::inference::infer;
use crate::options::ValidatorOptions;
use crate::schema::SchemaNode;
use crate::value::{expect_object, Instance, ValueKind};

#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Size guard for one instance. Only measures when a limit is set.
    pub fn check_size(&self, instance: &Instance<'_>) -> Result<()> {
        match self.options.size_limit() {
            Some(limit) => check_size(instance.byte_len(), Some(limit)),
            None => Ok(()),
        }
    }

    /// Strict equality: does the instance have exactly this shape?
    ///
    /// Returns `Ok(false)` on any structural difference. Errors are reserved
    /// for oversized payloads and for input that is not an object-rooted
    /// JSON document.
    pub fn is_valid<'a>(&self, instance: impl Into<Instance<'a>>, schema: &SchemaNode) -> Result<bool> {
        let instance = instance.into();
        self.check_size(&instance)?;
        let root = instance.load()?;
        expect_object(&root)?;
        let inferred = infer(&root)?;
        let equal = inferred == *schema;
        tracing::debug!(equal, "strict shape comparison");
        Ok(equal)
    }

    /// Recursive validation. `Ok(())` means the instance conforms.
    pub fn validate<'a>(&self, instance: impl Into<Instance<'a>>, schema: &SchemaNode) -> Result<()> {
        let instance = instance.into();
        self.check_size(&instance)?;
        let SchemaNode::Object(fields) = schema else {
            return Err(ValidationError::invalid_schema("", "schema root must be an object shape"));
        };
        let root = instance.load()?;
        let map = expect_object(&root)?;
        let result = self.validate_object(map, fields, "");
        if let Err(error) = &result {
            tracing::debug!(%error, "instance rejected");
        }
        result
    }

    /// [`Validator::is_valid`] over many instances against one shared schema.
    /// Results come back in input order.
    pub fn is_valid_all(&self, instances: &[Instance<'_>], schema: &SchemaNode) -> Vec<Result<bool>> {
        instances.par_iter().map(|i| self.is_valid(*i, schema)).collect()
    }

    /// [`Validator::validate`] over many instances against one shared schema.
    /// Results come back in input order.
    pub fn validate_all(&self, instances: &[Instance<'_>], schema: &SchemaNode) -> Vec<Result<()>> {
        instances.par_iter().map(|i| self.validate(*i, schema)).collect()
    }

    // ————————————————————————————————————————————————————————————————————————
    // WALK
    // ————————————————————————————————————————————————————————————————————————

    fn validate_object(
        &self,
        instance: &Map<String, Value>,
        schema: &IndexMap<String, SchemaNode>,
        path: &str,
    ) -> Result<()> {
        // 1) every schema key must be present
        for key in schema.keys() {
            if !instance.contains_key(key) {
                return Err(ValidationError::MissingKey { path: join_key(path, key) });
            }
        }
        // 2) every instance key must be declared
        for key in instance.keys() {
            if !schema.contains_key(key) {
                return Err(ValidationError::UnexpectedKey { path: join_key(path, key) });
            }
        }
        // 3) loose typing stops at key reconciliation
        if self.options.loosely_typed {
            return Ok(());
        }
        // 4) per-key dispatch, in schema order
        for (key, node) in schema {
            let path = join_key(path, key);
            tracing::trace!(%path, expected = %node, "checking key");
            self.check_value(&instance[key.as_str()], node, &path)?;
        }
        Ok(())
    }

    fn check_value(&self, value: &Value, node: &SchemaNode, path: &str) -> Result<()> {
        match node {
            SchemaNode::Scalar(t) => {
                if t.matches(value) {
                    Ok(())
                } else {
                    Err(mismatch(path, node, value))
                }
            }
            SchemaNode::Object(fields) => match value.as_object() {
                Some(map) => self.validate_object(map, fields, path),
                None => Err(mismatch(path, node, value)),
            },
            SchemaNode::ListOf(inner) => {
                let Some(items) = value.as_array() else {
                    return Err(mismatch(path, node, value));
                };
                for (i, item) in items.iter().enumerate() {
                    self.check_value(item, inner, &join_index(path, i))?;
                }
                Ok(())
            }
            SchemaNode::Union(members) => {
                if members.iter().any(|m| self.check_value(value, m, path).is_ok()) {
                    Ok(())
                } else {
                    Err(mismatch(path, node, value))
                }
            }
            SchemaNode::Predicate(p) => {
                if p.call(value) {
                    Ok(())
                } else {
                    Err(ValidationError::PredicateFailed {
                        path: path.to_string(),
                        predicate: p.name().to_string(),
                        value: value.clone(),
                    })
                }
            }
        }
    }
}

fn mismatch(path: &str, expected: &SchemaNode, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: ValueKind::of(value),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::schema::{Predicate, ScalarType};
    use serde_json::json;

    fn strict() -> Validator { Validator::default() }

    fn loose() -> Validator {
        Validator::new(ValidatorOptions { loosely_typed: true, ..Default::default() })
    }

    fn person() -> SchemaNode {
        SchemaNode::object([("name", ScalarType::String.into()), ("age", ScalarType::Int.into())])
    }

    #[test]
    fn concrete_scenario() {
        let v = strict();
        assert!(v.validate(r#"{"name":"Eggs","age":3}"#, &person()).is_ok());

        let err = v.validate(r#"{"name":"Eggs"}"#, &person()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingKey { ref path } if path == "age"));

        let err = v.validate(r#"{"name":"Eggs","age":3,"extra":1}"#, &person()).unwrap_err();
        assert!(matches!(err, ValidationError::UnexpectedKey { ref path } if path == "extra"));
    }

    #[test]
    fn missing_key_wins_over_type_mismatch() {
        let err = strict().validate(&json!({"name": 5}), &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
    }

    #[test]
    fn scalar_mismatch_reports_expected_and_actual() {
        let err = strict().validate(&json!({"name": "x", "age": 3.5}), &person()).unwrap_err();
        match err {
            ValidationError::TypeMismatch { path, expected, actual } => {
                assert_eq!(path, "age");
                assert_eq!(expected, "int");
                assert_eq!(actual, ValueKind::Float);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nested_failures_carry_the_key_path() {
        let schema = SchemaNode::object([(
            "marks",
            SchemaNode::object([("english", ScalarType::Float.into())]),
        )]);
        let err = strict().validate(&json!({"marks": {"english": "A"}}), &schema).unwrap_err();
        assert_eq!(err.path(), Some("marks.english"));
        let err = strict().validate(&json!({"marks": {}}), &schema).unwrap_err();
        assert!(matches!(err, ValidationError::MissingKey { ref path } if path == "marks.english"));
        let err = strict().validate(&json!({"marks": [1]}), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn union_lists_accept_members_and_reject_others() {
        let schema = SchemaNode::object([(
            "xs",
            SchemaNode::list_of(SchemaNode::union([
                ScalarType::String.into(),
                ScalarType::Int.into(),
                ScalarType::Float.into(),
            ])),
        )]);
        assert!(strict().validate(&json!({"xs": ["a", 1, 2.5]}), &schema).is_ok());
        let err = strict().validate(&json!({"xs": ["a", true]}), &schema).unwrap_err();
        match err {
            ValidationError::TypeMismatch { path, actual, .. } => {
                assert_eq!(path, "xs[1]");
                assert_eq!(actual, ValueKind::Bool);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn list_elements_can_be_objects() {
        let schema = SchemaNode::object([(
            "people",
            SchemaNode::list_of(person()),
        )]);
        let ok = json!({"people": [{"name": "a", "age": 1}, {"name": "b", "age": 2}]});
        assert!(strict().validate(&ok, &schema).is_ok());
        let bad = json!({"people": [{"name": "a", "age": 1}, {"name": "b"}]});
        let err = strict().validate(&bad, &schema).unwrap_err();
        assert!(matches!(err, ValidationError::MissingKey { ref path } if path == "people[1].age"));
    }

    #[test]
    fn list_schema_rejects_non_lists() {
        let schema = SchemaNode::object([("xs", SchemaNode::list_of(ScalarType::Int.into()))]);
        let err = strict().validate(&json!({"xs": 1}), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn empty_union_list_matches_only_empty_lists() {
        let schema = SchemaNode::object([("xs", SchemaNode::list_of(SchemaNode::Union(vec![])))]);
        assert!(strict().validate(&json!({"xs": []}), &schema).is_ok());
        assert!(strict().validate(&json!({"xs": [1]}), &schema).is_err());
        assert!(strict().is_valid(&json!({"xs": []}), &schema).unwrap());
        assert!(!strict().is_valid(&json!({"xs": [1]}), &schema).unwrap());
    }

    #[test]
    fn predicate_scenario() {
        let is_email = Predicate::new("is_email", |v| v.as_str().is_some_and(|s| s.contains('@')));
        let schema = SchemaNode::object([("email", SchemaNode::predicate(is_email))]);
        assert!(strict().validate(&json!({"email": "a@b.c"}), &schema).is_ok());
        let err = strict().validate(&json!({"email": "not-an-email"}), &schema).unwrap_err();
        match err {
            ValidationError::PredicateFailed { path, predicate, value } => {
                assert_eq!(path, "email");
                assert_eq!(predicate, "is_email");
                assert_eq!(value, json!("not-an-email"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn panicking_predicate_fails_instead_of_unwinding() {
        let p = Predicate::new("boom", |_| panic!("boom"));
        let schema = SchemaNode::object([("x", SchemaNode::predicate(p))]);
        let err = strict().validate(&json!({"x": 1}), &schema).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PredicateFailed);
    }

    #[test]
    fn loose_typing_only_reconciles_keys() {
        assert!(loose().validate(&json!({"name": 1, "age": "x"}), &person()).is_ok());
        let err = loose().validate(&json!({"name": 1}), &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
    }

    #[test]
    fn loose_typing_with_disjoint_keys_of_equal_size_is_missing_key() {
        let err = loose().validate(&json!({"nom": 1, "years": 2}), &person()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingKey { ref path } if path == "name"));
    }

    #[test]
    fn loose_typing_does_not_descend() {
        let schema = SchemaNode::object([("inner", SchemaNode::object([("a", ScalarType::Int.into())]))]);
        assert!(loose().validate(&json!({"inner": 42}), &schema).is_ok());
    }

    #[test]
    fn size_guard_runs_before_parsing() {
        let v = Validator::new(ValidatorOptions { max_size_in_bytes: Some(10), ..Default::default() });
        // not even JSON; the guard still fires first
        let err = v.validate("this is not json at all", &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeExceeded);
        let err = v.is_valid(r#"{"name":"Eggs"}"#, &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeExceeded);
    }

    #[test]
    fn non_object_schema_root_is_invalid() {
        let err = strict().validate("{}", &SchemaNode::Scalar(ScalarType::Int)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchemaDefinition);
    }

    #[test]
    fn non_object_instance_is_a_deserialization_error() {
        let err = strict().validate("[1, 2]", &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        let err = strict().is_valid("nope", &person()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
    }

    #[test]
    fn strict_equality_distinguishes_shapes() {
        let v = strict();
        assert!(v.is_valid(r#"{"name":"Eggs","age":3}"#, &person()).unwrap());
        assert!(v.is_valid(r#"{"age":3,"name":"Eggs"}"#, &person()).unwrap());
        assert!(!v.is_valid(r#"{"name":"Eggs","age":3.0}"#, &person()).unwrap());
        assert!(!v.is_valid(r#"{"name":"Eggs"}"#, &person()).unwrap());
    }

    #[test]
    fn both_modes_agree_on_hand_built_single_unions() {
        let schema = SchemaNode::object([(
            "xs",
            SchemaNode::list_of(SchemaNode::Union(vec![ScalarType::Int.into()])),
        )]);
        let instance = json!({"xs": [1, 2]});
        assert!(strict().validate(&instance, &schema).is_ok());
        assert!(strict().is_valid(&instance, &schema).unwrap());
    }

    #[test]
    fn strict_equality_never_matches_predicates() {
        let schema = SchemaNode::object([("x", SchemaNode::predicate(Predicate::new("any", |_| true)))]);
        assert!(!strict().is_valid(&json!({"x": 1}), &schema).unwrap());
    }

    #[test]
    fn batch_results_keep_input_order() {
        let a = json!({"name": "a", "age": 1});
        let b = json!({"name": "b"});
        let instances = [Instance::from(&a), Instance::from(&b), Instance::from("{}")];
        let results = strict().validate_all(&instances, &person());
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().kind(), ErrorKind::MissingKey);
        assert_eq!(results[2].as_ref().unwrap_err().kind(), ErrorKind::MissingKey);

        let flags = strict().is_valid_all(&instances, &person());
        assert!(matches!(flags[..], [Ok(true), Ok(false), Ok(false)]));
    }
}
