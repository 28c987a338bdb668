//! Configuration loading errors.

/// What went wrong while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A source could not be read or is not valid TOML.
    #[display("Unreadable source {}: {}", source, message)]
    Unreadable {
        /// File path or source name
        source: String,
        /// Underlying reason
        message: String,
    },
    /// The merged sources do not describe a valid configuration.
    #[display("Invalid configuration: {}", _0)]
    Invalid(String),
}

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// Error kind
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A source that could not be read or parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::unreadable("./warden.toml", "expected `=`");
    /// assert!(matches!(err.kind(), ConfigErrorKind::Unreadable { .. }));
    /// assert!(err.to_string().contains("./warden.toml"));
    /// ```
    #[track_caller]
    pub fn unreadable(source: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::new(ConfigErrorKind::Unreadable {
            source: source.into(),
            message: message.to_string(),
        })
    }

    /// Values that do not fit the configuration schema.
    #[track_caller]
    pub fn invalid(message: impl std::fmt::Display) -> Self {
        Self::new(ConfigErrorKind::Invalid(message.to_string()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
