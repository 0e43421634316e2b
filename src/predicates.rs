//! Built-in named predicates, available to schema documents as `"@name"`.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::{Predicate, PredicateRegistry};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Registry holding `email`, `uri` and `non_empty`.
pub fn builtin() -> PredicateRegistry {
    PredicateRegistry::new()
        .with(Predicate::new("email", |v| v.as_str().is_some_and(|s| EMAIL.is_match(s))))
        .with(Predicate::new("uri", |v| v.as_str().is_some_and(looks_like_uri)))
        .with(Predicate::new("non_empty", non_empty))
}

pub fn looks_like_uri(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
        || s.starts_with("mailto:") || s.starts_with("tel:")
}

fn non_empty(v: &Value) -> bool {
    match v {
        Value::String(s) => !s.is_empty(),
        Value::Array(xs) => !xs.is_empty(),
        Value::Object(m) => !m.is_empty(),
        _ => false,
    }
}
