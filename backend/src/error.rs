//! Error types for the portal crate.
//!
//! The pure computations (phase resolution, filtering, pagination) never
//! fail; errors only come from the edges: configuration files, the
//! dismissal store, input parsers and record sources.

use std::fmt;

/// Result type for portal operations
pub type PortalResult<T> = Result<T, PortalError>;

/// Where an error happened: the failing step, the file or key it was
/// working on and, for parse failures, the position in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Step that failed, e.g. `load_config`, `fetch_records`
    pub operation: Option<String>,
    /// File path or config name the step was working on
    pub path: Option<String>,
    /// `line=.. column=..` inside a JSON document
    pub location: Option<String>,
    /// A later attempt may succeed; drives [`crate::services::retry_async`]
    pub transient: bool,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    fn is_blank(&self) -> bool {
        self.operation.is_none() && self.path.is_none() && self.location.is_none() && !self.transient
    }
}

/// Renders as ` (in load_config on portal.toml)`, or nothing when empty.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return Ok(());
        }
        f.write_str(" (")?;
        let mut sep = "";
        if let Some(op) = &self.operation {
            write!(f, "in {}", op)?;
            sep = " ";
        }
        if let Some(path) = &self.path {
            write!(f, "{}on {}", sep, path)?;
            sep = " ";
        }
        if let Some(location) = &self.location {
            write!(f, "{}at {}", sep, location)?;
            sep = " ";
        }
        if self.transient {
            write!(f, "{}[transient]", sep)?;
        }
        f.write_str(")")
    }
}

/// Error type for portal operations
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Configuration file missing, unreadable or invalid.
    #[error("Configuration error: {message}{context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// Reading or writing the client-local key-value store failed.
    #[error("Storage error: {message}{context}")]
    StorageError {
        message: String,
        context: ErrorContext,
    },

    /// Input document could not be parsed.
    #[error("Parse error: {message}{context}")]
    ParseError {
        message: String,
        context: ErrorContext,
    },

    /// Upstream record source failed. Usually transient.
    #[error("Source error: {message}{context}")]
    SourceError {
        message: String,
        context: ErrorContext,
    },

    /// Data validation failed.
    #[error("Validation error: {message}{context}")]
    ValidationError {
        message: String,
        context: ErrorContext,
    },
}

impl PortalError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a storage error with context.
    pub fn storage_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::StorageError {
            message: message.into(),
            context,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a parse error with context.
    pub fn parse_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ParseError {
            message: message.into(),
            context,
        }
    }

    /// Create a source error. Source errors are retryable by default.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceError {
            message: message.into(),
            context: ErrorContext::default().transient(),
        }
    }

    /// Create a source error with full context.
    pub fn source_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::SourceError {
            message: message.into(),
            context,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SourceError { context, .. } => context.transient,
            Self::StorageError { context, .. } => context.transient,
            _ => false,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConfigurationError { context, .. } => context,
            Self::StorageError { context, .. } => context,
            Self::ParseError { context, .. } => context,
            Self::SourceError { context, .. } => context,
            Self::ValidationError { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConfigurationError { context, .. }
            | Self::StorageError { context, .. }
            | Self::ParseError { context, .. }
            | Self::SourceError { context, .. }
            | Self::ValidationError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::parse_with_context(
            err.to_string(),
            ErrorContext {
                location: Some(format!("line={} column={}", err.line(), err.column())),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("fetch_records")
            .at("universities.json")
            .transient();
        assert_eq!(ctx.to_string(), " (in fetch_records on universities.json [transient])");

        let err = PortalError::configuration("bad value")
            .with_operation("load_config");
        assert_eq!(err.to_string(), "Configuration error: bad value (in load_config)");
    }

    #[test]
    fn test_empty_context_display() {
        assert_eq!(ErrorContext::default().to_string(), "");
        assert_eq!(PortalError::parse("oops").to_string(), "Parse error: oops");
    }

    #[test]
    fn test_source_errors_are_retryable() {
        assert!(PortalError::source_unavailable("upstream down").is_retryable());
        assert!(!PortalError::parse("bad json").is_retryable());
        assert!(!PortalError::configuration("bad toml").is_retryable());
    }

    #[test]
    fn test_with_operation_overrides() {
        let err = PortalError::storage("disk full").with_operation("dismiss_banner");
        assert_eq!(err.context().operation.as_deref(), Some("dismiss_banner"));
        assert!(err.to_string().starts_with("Storage error: disk full"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: PortalError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PortalError::ParseError { .. }));
        assert!(err.context().location.as_deref().unwrap().starts_with("line="));
    }
}
