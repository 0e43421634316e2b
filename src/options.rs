//! Validator configuration.
//!
//! Options can be built in code or read from a small JSON file:
//!
//! ```json
//! { "max_size_in_bytes": 1000, "loosely_typed": false }
//! ```
use std::path::Path;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Reject payloads larger than this many bytes. `None` or `0` disables the check.
    pub max_size_in_bytes: Option<usize>,
    /// Only reconcile key sets; skip every type and predicate check.
    pub loosely_typed: bool,
}

impl ValidatorOptions {
    /// The effective size limit, with `0` normalized to "no limit".
    pub fn size_limit(&self) -> Option<usize> {
        self.max_size_in_bytes.filter(|n| *n > 0)
    }

    /// Decode options from JSON text, naming the offending JSON path on error.
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(src);
        serde_path_to_error::deserialize::<_, Self>(de).map_err(|err| {
            let path = err.path().to_string();
            anyhow!("at JSON path {path} → {}", err.into_inner())
        })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;
        Self::from_json_str(&src)
            .with_context(|| format!("invalid options file {}", path.display()))
    }

    /// Overlay explicitly given values on top of `self`.
    pub fn merged(mut self, max_size_in_bytes: Option<usize>, loosely_typed: bool) -> Self {
        if max_size_in_bytes.is_some() {
            self.max_size_in_bytes = max_size_in_bytes;
        }
        self.loosely_typed |= loosely_typed;
        self
    }
}
