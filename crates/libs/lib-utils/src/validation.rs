//! # Validation Utilities
//!
//! Input validation helpers for chat and message payloads.

/// Validate that a string is not empty (after trimming).
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate maximum length.
pub fn validate_max_length(value: &str, max: usize, field_name: &str) -> Result<(), String> {
    if value.len() > max {
        Err(format!("{} must be at most {} characters", field_name, max))
    } else {
        Ok(())
    }
}

/// Validate that a member list carries at least `min` entries.
pub fn validate_min_members(count: usize, min: usize) -> Result<(), String> {
    if count < min {
        Err(format!(
            "At least {} other members are required to form a group chat",
            min
        ))
    } else {
        Ok(())
    }
}
