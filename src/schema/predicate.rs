use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

type PredicateFn = dyn Fn(&Value) -> anyhow::Result<bool> + Send + Sync;

/// A named `Value -> bool` check attached to a schema leaf.
///
/// Calling a predicate never fails: an `Err` or a panic inside the wrapped
/// function counts as "did not pass".
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    func: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(name: impl AsRef<str>, func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::fallible(name, move |v| Ok(func(v)))
    }

    pub fn fallible<F>(name: impl AsRef<str>, func: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self { name: Arc::from(name.as_ref()), func: Arc::new(func) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, value: &Value) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.func)(value))) {
            Ok(Ok(passed)) => passed,
            Ok(Err(error)) => {
                tracing::debug!(predicate = %self.name, %error, "predicate returned an error");
                false
            }
            Err(_) => {
                tracing::debug!(predicate = %self.name, "predicate panicked");
                false
            }
        }
    }
}

/// Two predicates are equal only if they wrap the same function object.
impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

/// Named predicates that schema documents can refer to as `"@name"`.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    entries: IndexMap<String, Predicate>,
}

impl PredicateRegistry {
    pub fn new() -> Self { Self::default() }

    /// Register under the predicate's own name, replacing any previous entry.
    pub fn register(&mut self, predicate: Predicate) -> &mut Self {
        self.entries.insert(predicate.name().to_string(), predicate);
        self
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.register(predicate);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
