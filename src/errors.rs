/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * Per-file failures are not errors at this level: they are recorded in the
 * batch result (see `job::FailureReason`) and never abort a job.
 */

use thiserror::Error;

use crate::app_config::Engine;

/// Errors that can occur when talking to the translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Classify a reqwest failure into the matching transport variant
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by the language catalog collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog could not be fetched
    #[error("Language catalog unavailable: {0}")]
    Unavailable(#[from] ProviderError),
}

/// Reasons a job is rejected before any file is processed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidJob {
    /// The job has no files
    #[error("Invalid job: no files were submitted")]
    NoFiles,

    /// The target language is empty or blank
    #[error("Invalid job: a target language is required")]
    MissingTargetLanguage,

    /// The engine identifier is not part of the known set
    #[error("Invalid job: unknown translation engine '{0}'")]
    UnknownEngine(String),

    /// The engine is known but not enabled in the configuration
    #[error("Invalid job: translation engine '{0}' is not enabled")]
    EngineNotEnabled(Engine),
}

/// Rejected state transition on a file task
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Illegal transition for '{file}': {from} -> {to}")]
pub struct TaskStateError {
    /// File the task belongs to
    pub file: String,
    /// State the task was in
    pub from: &'static str,
    /// State that was requested
    pub to: &'static str,
}

/// Errors that abort a whole job run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// Pre-flight validation failed
    #[error(transparent)]
    Invalid(#[from] InvalidJob),

    /// A file task was driven into an illegal state
    #[error("Task state error: {0}")]
    TaskState(#[from] TaskStateError),
}
