//! Top-level error wrapper types.

use crate::{CacheError, ConfigError, HttpError, StoreError};

/// Every error the data-access layer can produce.
///
/// # Examples
///
/// ```
/// use warden_error::{ConfigError, WardenError, WardenErrorKind};
///
/// let err: WardenError = ConfigError::invalid("bad port").into();
/// assert!(matches!(err.kind(), WardenErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WardenErrorKind {
    /// Local cache error
    #[from(CacheError)]
    Cache(CacheError),
    /// Remote hash store error
    #[from(StoreError)]
    Store(StoreError),
    /// Upstream HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Warden error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Warden Error: {}", _0)]
pub struct WardenError(Box<WardenErrorKind>);

impl WardenError {
    /// Create a new error from a kind.
    pub fn new(kind: WardenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WardenErrorKind {
        &self.0
    }
}

impl<T> From<T> for WardenError
where
    T: Into<WardenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Warden operations.
pub type WardenResult<T> = std::result::Result<T, WardenError>;
