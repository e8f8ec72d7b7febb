//! Pipeline client errors

use thiserror::Error;

use crate::types::TaskType;

/// Errors that can occur while talking to the Bhashini pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching the pipeline configuration failed, or the local configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The pipeline configuration payload does not match the expected schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// Argument outside the accepted values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No service handles the task for this language
    #[error(
        "{task} not supported for language '{language}'. Available languages: {}",
        .available.join(", ")
    )]
    UnsupportedLanguage {
        /// Task that was requested
        task: TaskType,
        /// Requested language code
        language: String,
        /// Languages the pipeline offers for the task
        available: Vec<String>,
    },

    /// No translation service for this source/target combination
    #[error(
        "Translation from '{source_language}' to '{target_language}' not supported. Available target languages for '{source_language}': {}",
        .available.join(", ")
    )]
    UnsupportedLanguagePair {
        /// Requested source language
        source_language: String,
        /// Requested target language
        target_language: String,
        /// Targets offered for the source language
        available: Vec<String>,
    },

    /// The TTS service does not offer the requested voice
    #[error(
        "Gender '{gender}' not supported for language '{language}'. Available voices: {}",
        .available.join(", ")
    )]
    UnsupportedVoice {
        /// Requested language
        language: String,
        /// Requested gender
        gender: String,
        /// Voices the service offers
        available: Vec<String>,
    },

    /// The inference endpoint answered with a non-success status
    #[error("Inference failed (HTTP {status}): {message}")]
    Inference {
        /// HTTP status code
        status: u16,
        /// Server-supplied message, or the raw response body
        message: String,
    },

    /// Failed to connect to the inference endpoint
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the inference endpoint failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Response body could not be read or lacks an expected field
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
