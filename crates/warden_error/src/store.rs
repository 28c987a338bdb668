//! Remote hash store error types.

/// Kinds of remote hash store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// The remote store could not be reached (connection refused, timeout, dropped socket)
    #[display("Remote store unavailable: {}", _0)]
    Unavailable(String),
    /// The store answered with an error reply
    #[display("Store command {} failed: {}", command, message)]
    Command {
        /// Command name, e.g. `HSET`
        command: String,
        /// Error text returned by the server
        message: String,
    },
    /// A stored value could not be encoded or decoded
    #[display("Value codec error: {}", _0)]
    Codec(String),
    /// Invalid connection configuration
    #[display("Invalid store configuration: {}", _0)]
    InvalidConfig(String),
}

/// Remote hash store error with location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Unavailable("connection refused".into()));
/// assert!(err.is_unavailable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }

    /// Whether this is a transport-level failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Unavailable(_))
    }
}

/// Result type for remote hash store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
