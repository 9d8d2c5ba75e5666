//! Named sets of allowed values for enumerated string fields.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// A closed set of string values a record field may take.
///
/// Sets are declared as constants next to the entity they belong to and handed
/// to validators, so the rules live in one place per entity type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AllowedValues {
    field: &'static str,
    values: &'static [&'static str],
    hint: &'static str,
}

impl AllowedValues {
    /// Rejection wording used by the tasks and posts services.
    pub const MUST_BE_ONE_OF: &'static str = "Must be one of";
    /// Rejection wording used by the users service.
    pub const USE_ONE_OF: &'static str = "Use one of";

    pub const fn new(field: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            field,
            values,
            hint: Self::MUST_BE_ONE_OF,
        }
    }

    /// Override the wording placed before the value list in rejections.
    pub const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = hint;
        self
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// Check a JSON value against the set. Non-string values are never allowed.
    pub fn check(&self, value: &Value) -> DomainResult<()> {
        match value.as_str() {
            Some(s) if self.contains(s) => Ok(()),
            _ => Err(self.rejection()),
        }
    }

    /// Check `record[field]` only when the field is present and non-null.
    pub fn check_if_present(&self, record: &crate::Record) -> DomainResult<()> {
        match record.get(self.field) {
            Some(v) if !v.is_null() => self.check(v),
            _ => Ok(()),
        }
    }

    /// Check `record[field]`, treating an absent field as invalid.
    pub fn check_required(&self, record: &crate::Record) -> DomainResult<()> {
        self.check(record.get(self.field).unwrap_or(&Value::Null))
    }

    pub fn rejection(&self) -> DomainError {
        DomainError::InvalidValue {
            field: self.field,
            hint: self.hint,
            allowed: self.values.join(", "),
        }
    }
}
