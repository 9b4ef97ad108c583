//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, PlatformError, TemplateError};

/// This is the foundation error enum shared by every kbbq crate.
///
/// # Examples
///
/// ```
/// use kbbq_error::{KbbqError, PlatformError, PlatformErrorKind};
///
/// let err: KbbqError = PlatformError::new(PlatformErrorKind::UnknownRole).into();
/// assert!(format!("{}", err).contains("Unknown role"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum KbbqErrorKind {
    /// Persistence error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Template / validation error
    #[from(TemplateError)]
    Template(TemplateError),
}

/// kbbq error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("kbbq Error: {}", _0)]
pub struct KbbqError(Box<KbbqErrorKind>);

impl KbbqError {
    /// Create a new error from a kind.
    pub fn new(kind: KbbqErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KbbqErrorKind {
        &self.0
    }

    /// The platform error, if this is one.
    pub fn as_platform(&self) -> Option<&PlatformError> {
        match self.kind() {
            KbbqErrorKind::Platform(e) => Some(e),
            _ => None,
        }
    }

    /// The template error, if this is one.
    pub fn as_template(&self) -> Option<&TemplateError> {
        match self.kind() {
            KbbqErrorKind::Template(e) => Some(e),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to KbbqErrorKind
impl<T> From<T> for KbbqError
where
    T: Into<KbbqErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for kbbq operations.
pub type KbbqResult<T> = std::result::Result<T, KbbqError>;
