//! Local cache error types.

/// Kinds of local cache errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CacheErrorKind {
    /// The key is not present in the cache
    #[display("Key not found: {}", _0)]
    KeyNotFound(String),
}

/// Local cache error with location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{CacheError, CacheErrorKind};
///
/// let err = CacheError::new(CacheErrorKind::KeyNotFound("42".to_string()));
/// assert!(format!("{}", err).contains("Key not found: 42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Cache Error: {} at line {} in {}", kind, line, file)]
pub struct CacheError {
    /// The kind of error that occurred
    pub kind: CacheErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CacheError {
    /// Create a new cache error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CacheErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a missing key, rendered with its `Debug` form.
    #[track_caller]
    pub fn key_not_found(key: &impl std::fmt::Debug) -> Self {
        Self::new(CacheErrorKind::KeyNotFound(format!("{:?}", key)))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CacheErrorKind {
        &self.kind
    }
}

/// Result type for local cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
