//! Message template error types.

/// Template error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TemplateErrorKind {
    /// The payload is not valid JSON (before or after placeholder substitution).
    #[display("Invalid JSON: {_0}")]
    InvalidJson(String),
    /// A command argument failed validation.
    #[display("Invalid argument: {_0}")]
    InvalidArgument(String),
}

/// Template error with source location tracking.
///
/// These are surfaced to the invoking user as validation replies.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The kind of error that occurred
    pub kind: TemplateErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
