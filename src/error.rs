//! Error types for the Falx library.
//!
//! This module provides error handling for all Falx operations. All errors
//! are represented by the [`FalxError`] enum.
//!
//! # Examples
//!
//! ```
//! use falx::error::{FalxError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FalxError::invalid_model_state("class prior must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Falx operations.
///
/// Model-state and configuration errors indicate violated invariants in
/// upstream data or caller preconditions; they are never retried internally.
#[derive(Error, Debug)]
pub enum FalxError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Corrupted model state: non-positive prior, probability outside (0, 1],
    /// negative counts. Indicates upstream data corruption, not a user error.
    #[error("Invalid model state: {0}")]
    InvalidModelState(String),

    /// A combination of scoring options that the engine does not support.
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FalxError.
pub type Result<T> = std::result::Result<T, FalxError>;

impl FalxError {
    /// Create a new invalid model state error.
    pub fn invalid_model_state<S: Into<String>>(msg: S) -> Self {
        FalxError::InvalidModelState(msg.into())
    }

    /// Create a new unsupported configuration error.
    pub fn unsupported_configuration<S: Into<String>>(msg: S) -> Self {
        FalxError::UnsupportedConfiguration(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FalxError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        FalxError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
