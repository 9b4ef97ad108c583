//! Chat platform (REST API) error types.

/// Platform error conditions.
///
/// The first four variants are the ones the engines branch on; everything
/// else the platform reports lands in [`PlatformErrorKind::Http`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PlatformErrorKind {
    /// The member left the guild or never existed.
    #[display("Unknown member")]
    UnknownMember,
    /// The role was deleted.
    #[display("Unknown role")]
    UnknownRole,
    /// The channel was deleted or is not visible.
    #[display("Unknown channel")]
    UnknownChannel,
    /// The bot lacks a permission for the operation.
    #[display("Missing permissions: {_0}")]
    MissingPermissions(String),
    /// The platform rejected the request body (e.g. a malformed embed template).
    #[display("Invalid payload: {_0}")]
    InvalidPayload(String),
    /// Any other transport or API failure.
    #[display("HTTP error: {_0}")]
    Http(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// The kind of error that occurred
    pub kind: PlatformErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use kbbq_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::UnknownMember);
    /// assert!(err.is_expected_absence());
    /// assert!(!err.is_permission());
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the error means the target simply no longer exists.
    pub fn is_expected_absence(&self) -> bool {
        matches!(
            self.kind,
            PlatformErrorKind::UnknownMember
                | PlatformErrorKind::UnknownRole
                | PlatformErrorKind::UnknownChannel
        )
    }

    /// Whether the bot was denied by the permission system.
    pub fn is_permission(&self) -> bool {
        matches!(self.kind, PlatformErrorKind::MissingPermissions(_))
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
