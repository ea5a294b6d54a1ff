// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
///
/// Probe results never surface here: failed probes degrade to a negative
/// `ProbeReport`. These errors cover setup and wiring only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
