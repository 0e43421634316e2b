//! Structural JSON schemas: infer one from an example instance, then check
//! other instances against it (or against a hand-written schema).
//!
//! ```
//! use json_shape::{create_schema, Validator, ValidatorOptions};
//!
//! let schema = create_schema(r#"{"name": "Eggs", "age": 3}"#).unwrap();
//! let validator = Validator::new(ValidatorOptions::default());
//!
//! assert!(validator.is_valid(r#"{"age": 7, "name": "Ham"}"#, &schema).unwrap());
//! assert!(validator.validate(r#"{"name": "Ham"}"#, &schema).is_err());
//! ```
pub mod cli;
pub mod error;
pub mod guard;
pub mod inference;
pub mod matcher;
pub mod options;
pub mod predicates;
pub mod schema;
pub mod value;

pub use error::{ErrorKind, Result, ValidationError};
pub use guard::check_size;
pub use inference::{create_schema, infer};
pub use matcher::Validator;
pub use options::ValidatorOptions;
pub use schema::{Predicate, PredicateRegistry, ScalarType, SchemaNode};
pub use value::{Instance, ValueKind};
