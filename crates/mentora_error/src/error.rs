//! Top-level error wrapper types.

use crate::{ConfigError, ValidationError};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// This is the foundation error enum. Variants cover each Mentora subsystem.
///
/// # Examples
///
/// ```
/// use mentora_error::{MentoraError, ValidationError};
///
/// let v = ValidationError::single("email", "email is required");
/// let err: MentoraError = v.into();
/// assert!(format!("{}", err).contains("Validation"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MentoraErrorKind {
    /// Request input rejected with a per-field error map
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Mentora error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mentora_error::{MentoraResult, ConfigError};
///
/// fn might_fail() -> MentoraResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Mentora Error: {}", _0)]
pub struct MentoraError(Box<MentoraErrorKind>);

impl MentoraError {
    /// Create a new error from a kind.
    pub fn new(kind: MentoraErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MentoraErrorKind {
        &self.0
    }

    /// Whether the underlying failure is a missing record.
    pub fn is_not_found(&self) -> bool {
        match self.kind() {
            #[cfg(feature = "database")]
            MentoraErrorKind::Database(db) => db.is_not_found(),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to MentoraErrorKind
impl<T> From<T> for MentoraError
where
    T: Into<MentoraErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Mentora operations.
///
/// # Examples
///
/// ```
/// use mentora_error::{MentoraResult, ValidationError};
///
/// fn create() -> MentoraResult<i32> {
///     Err(ValidationError::single("name", "name is required"))?
/// }
/// ```
pub type MentoraResult<T> = std::result::Result<T, MentoraError>;
