//! Validation error model.

use thiserror::Error;

/// Result type used by the validators/enrichers.
pub type DomainResult<T> = Result<T, DomainError>;

/// A rejected write.
///
/// Every variant is a client input problem; the HTTP layer surfaces all of them
/// as `400` with `{ "error": <Display> }`, so the `Display` text is the exact
/// message clients see.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field holds a value outside its allowed set.
    #[error("Invalid {field}. {hint}: {allowed}")]
    InvalidValue {
        field: &'static str,
        hint: &'static str,
        allowed: String,
    },

    /// A foreign key does not resolve to an existing record.
    #[error("{0}")]
    InvalidReference(String),

    /// A value that must be unique is already taken.
    #[error("{0}")]
    Duplicate(String),

    /// The request body is missing or not a JSON object.
    #[error("{0}")]
    MalformedBody(String),
}

impl DomainError {
    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn malformed_body(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_renders_field_hint_and_allowed_list() {
        let err = DomainError::InvalidValue {
            field: "status",
            hint: "Must be one of",
            allowed: "a, b".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid status. Must be one of: a, b");
    }

    #[test]
    fn free_form_variants_render_message_verbatim() {
        assert_eq!(
            DomainError::duplicate("Email already exists.").to_string(),
            "Email already exists."
        );
        assert_eq!(
            DomainError::invalid_reference("Invalid roleId").to_string(),
            "Invalid roleId"
        );
    }
}
