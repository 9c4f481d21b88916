use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while obtaining a structured answer from the LLM provider
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Provider rejected credentials: {message}")]
    Unauthenticated { message: String },

    #[error("Provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Schema violation after {attempts} attempt(s): {message}")]
    SchemaViolation { message: String, attempts: u32 },

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the web search integration
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search provider not configured")]
    NotConfigured,

    #[error("Search API error: {status}")]
    Api { status: u16 },

    #[error("Invalid search response: {message}")]
    InvalidResponse { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Use-case errors with structured details
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },
}

impl ToolError {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl AppError {
    /// Whether this error was caused by caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Tool(ToolError::Validation { .. }))
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;
