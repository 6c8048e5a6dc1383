//! Error types for ReportBuddy
//!
//! Connectivity and service failures propagate as `ReportError`; empty
//! retrievals and missing metadata fields are absorbed in-band as text and
//! never show up here.

use thiserror::Error;

use crate::generation::StageRole;

/// Main error type for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    /// Backing vector store could not be opened or reached
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Similarity query could not be executed
    #[error("Similarity query failed: {0}")]
    QueryError(String),

    /// Generation call exceeded its request timeout
    #[error("{stage} stage timed out after {timeout_secs}s")]
    GenerationTimeout { stage: StageRole, timeout_secs: u64 },

    /// Generation service rejected or failed the request
    #[error("{stage} stage failed: {message}")]
    GenerationServiceError { stage: StageRole, message: String },

    /// Query embedding could not be produced
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report delivery errors
    #[error("Delivery error: {0}")]
    DeliveryError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Report error: {0}")]
    Generic(String),
}

/// Discriminant of a `ReportError`, for callers that branch on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    IndexUnavailable,
    QueryError,
    GenerationTimeout,
    GenerationServiceError,
    Embedding,
    Config,
    Delivery,
    Http,
    Serialization,
    Io,
    Generic,
}

impl ReportError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::IndexUnavailable(_) => ErrorKind::IndexUnavailable,
            ReportError::QueryError(_) => ErrorKind::QueryError,
            ReportError::GenerationTimeout { .. } => ErrorKind::GenerationTimeout,
            ReportError::GenerationServiceError { .. } => ErrorKind::GenerationServiceError,
            ReportError::EmbeddingError(_) => ErrorKind::Embedding,
            ReportError::ConfigError(_) => ErrorKind::Config,
            ReportError::DeliveryError(_) => ErrorKind::Delivery,
            ReportError::HttpError(_) => ErrorKind::Http,
            ReportError::SerializationError(_) => ErrorKind::Serialization,
            ReportError::IoError(_) => ErrorKind::Io,
            ReportError::Generic(_) => ErrorKind::Generic,
        }
    }

    /// True for failures of a generation stage
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::GenerationTimeout | ErrorKind::GenerationServiceError
        )
    }
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Convert anyhow errors to ReportError
impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        ReportError::Generic(err.to_string())
    }
}
