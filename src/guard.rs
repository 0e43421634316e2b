//! Payload size guard, applied before any parsing or walking.

use crate::error::{Result, ValidationError};

/// Reject payloads whose byte length exceeds `max_size_in_bytes`.
///
/// `None` and `Some(0)` both mean "no limit".
pub fn check_size(raw_bytes_len: usize, max_size_in_bytes: Option<usize>) -> Result<()> {
    match max_size_in_bytes {
        Some(limit) if limit > 0 && raw_bytes_len > limit => {
            tracing::debug!(actual = raw_bytes_len, limit, "payload exceeds max size");
            Err(ValidationError::SizeExceeded { actual: raw_bytes_len, limit })
        }
        _ => Ok(()),
    }
}
