//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Maximum length of a component ID
pub const MAX_COMPONENT_ID_LENGTH: usize = 128;

/// Validate a component ID.
///
/// IDs are trimmed and must be 1-128 characters of ASCII letters, digits,
/// `-`, `_`, `.` or `:`.
///
/// Examples: `db-001`, `eu-west.lb_1`, `k8s:payments`
pub fn validate_component_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Component ID cannot be empty".to_string());
    }

    if s.len() > MAX_COMPONENT_ID_LENGTH {
        return Err(format!(
            "Component ID cannot exceed {MAX_COMPONENT_ID_LENGTH} characters, got {}",
            s.len()
        ));
    }

    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
    {
        return Err(format!(
            "Invalid character '{c}' in component ID '{s}'. Allowed: letters, digits, '-', '_', '.', ':'"
        ));
    }

    Ok(s.to_string())
}

/// Validate a display name: non-empty, single line.
pub fn validate_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s.chars().any(char::is_control) {
        return Err("Name cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}
