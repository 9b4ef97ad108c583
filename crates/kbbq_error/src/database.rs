//! Failures of the leveling store.

/// What went wrong talking to PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// The store could not be reached or the pool could not be built
    #[display("Leveling store unavailable: {}", _0)]
    Unavailable(String),
    /// Every pooled connection stayed busy past the checkout timeout
    #[display("No pooled connection free: {}", _0)]
    PoolExhausted(String),
    /// An insert collided with an existing row, e.g. a button position
    #[display("Conflicting row: {}", _0)]
    Conflict(String),
    /// A statement failed for any other reason
    #[display("Statement failed: {}", _0)]
    Query(String),
    /// A stored column could not be read back, e.g. a malformed embed payload
    #[display("Unreadable stored value: {}", _0)]
    Corrupt(String),
    /// Embedded schema migrations could not be applied
    #[display("Schema migration failed: {}", _0)]
    Migration(String),
    /// The blocking worker running a statement died
    #[display("Store worker aborted: {}", _0)]
    Worker(String),
    /// The addressed row does not exist
    #[display("No such row")]
    NotFound,
}

/// A store failure, stamped with where it was raised.
///
/// The engines never retry these in place and never swallow them on
/// leveling paths; [`DatabaseError::is_transient`] only tells the caller
/// whether the next event is likely to succeed.
///
/// # Examples
///
/// ```
/// use kbbq_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::PoolExhausted("timed out".into()));
/// assert!(err.is_transient());
/// assert!(err.to_string().contains("No pooled connection free"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// Failure category
    pub kind: DatabaseErrorKind,
    /// Line that raised it
    pub line: u32,
    /// File that raised it
    pub file: &'static str,
}

impl DatabaseError {
    /// Stamp `kind` with the caller's location.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The store was unreachable or saturated rather than the statement being wrong.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            DatabaseErrorKind::Unavailable(_) | DatabaseErrorKind::PoolExhausted(_)
        )
    }

    /// A uniqueness or reference constraint rejected the write.
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, DatabaseErrorKind::Conflict(_))
    }
}

#[cfg(feature = "database")]
impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind as Violation, Error};

        let kind = match &err {
            Error::NotFound => DatabaseErrorKind::NotFound,
            Error::DatabaseError(
                Violation::UniqueViolation | Violation::ForeignKeyViolation,
                info,
            ) => DatabaseErrorKind::Conflict(info.message().to_string()),
            Error::DatabaseError(Violation::ClosedConnection, info) => {
                DatabaseErrorKind::Unavailable(info.message().to_string())
            }
            Error::DeserializationError(cause) => DatabaseErrorKind::Corrupt(cause.to_string()),
            _ => DatabaseErrorKind::Query(err.to_string()),
        };
        DatabaseError::new(kind)
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Unavailable(err.to_string()))
    }
}
