//! Shared field-presence checks used by action `validate` steps

use crate::error::{FaasError, FaasResult};

/// Fail with `missing required field: <field>` when `value` is empty.
pub fn require(field: &str, value: &str) -> FaasResult<()> {
    if value.is_empty() {
        return Err(FaasError::missing_field(field));
    }
    Ok(())
}

/// Check `(field, value)` pairs in order and report the first empty one.
pub fn require_all(fields: &[(&str, &str)]) -> FaasResult<()> {
    fields
        .iter()
        .try_for_each(|(field, value)| require(field, value))
}

/// Fail with `message` unless at least one of `values` is non-empty.
pub fn require_any(values: &[&str], message: &str) -> FaasResult<()> {
    if values.iter().all(|v| v.is_empty()) {
        return Err(FaasError::validation(message));
    }
    Ok(())
}
