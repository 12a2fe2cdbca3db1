//! Validation error types.

use std::collections::BTreeMap;

/// Validation failure carrying a per-field error map.
///
/// Field order is stable (BTreeMap) so rendered error payloads are
/// deterministic.
///
/// # Examples
///
/// ```
/// use mentora_error::ValidationError;
///
/// let mut err = ValidationError::empty();
/// err.add("email", "email is already registered");
/// assert!(err.has_errors());
/// assert_eq!(err.fields().get("email").unwrap(), "email is already registered");
/// ```
#[derive(Debug, Clone, Default, derive_more::Display, derive_more::Error)]
#[display("Validation failed: {} field(s) rejected", fields.len())]
pub struct ValidationError {
    /// Rejected fields mapped to human-readable messages
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    /// Create an empty error map to accumulate into.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a validation error for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::empty();
        err.add(field, message);
        err
    }

    /// Record a rejected field. Later messages for the same field win.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    /// Whether any field was rejected.
    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// The per-field error map.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Consume into the per-field error map.
    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}
