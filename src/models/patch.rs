//! Partial-update helpers shared by the PATCH payloads
//!
//! Every entity has its own patch struct with `Option` fields. The merge rule
//! is the same for all of them: a supplied, non-blank value replaces the
//! stored one; an absent or blank value leaves the stored value unchanged.

/// Merge one supplied text value into a stored field. Returns whether the
/// stored value changed.
pub fn merge_text(stored: &mut String, supplied: Option<&str>) -> bool {
    match supplied {
        Some(value) if !value.trim().is_empty() && value != stored.as_str() => {
            *stored = value.to_string();
            true
        }
        _ => false,
    }
}

/// True when a patch carries at least one value that `merge_text` would apply.
pub fn has_any_value(fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .any(|f| f.map(|v| !v.trim().is_empty()).unwrap_or(false))
}
