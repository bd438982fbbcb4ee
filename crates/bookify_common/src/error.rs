// --- File: crates/bookify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

use crate::models::IntervalError;
use crate::services::ServiceError;

/// The base error type surfaced by Bookify HTTP handlers.
///
/// Each crate keeps its own domain error and converts into this one at the
/// handler boundary, so the status mapping lives in a single place.
#[derive(Error, Debug)]
pub enum BookifyError {
    /// Malformed or out-of-range input from the caller
    #[error("{0}")]
    ValidationError(String),

    /// The requested interval is no longer free
    #[error("{0}")]
    ConflictError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookifyError {
    fn status_code(&self) -> u16 {
        match self {
            BookifyError::ValidationError(_) => 400,
            BookifyError::ConflictError(_) => 409,
            BookifyError::ConfigError(_) => 500,
            BookifyError::ExternalServiceError { .. } => 502,
            BookifyError::InternalError(_) => 500,
        }
    }
}

impl From<ServiceError> for BookifyError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Conflict => {
                BookifyError::ConflictError("Sorry, that slot just got taken.".to_string())
            }
            ServiceError::InvalidResponse { service, message }
            | ServiceError::Unavailable { service, message } => {
                external_service_error(&service, message)
            }
        }
    }
}

impl From<IntervalError> for BookifyError {
    fn from(err: IntervalError) -> Self {
        BookifyError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> BookifyError {
    BookifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> BookifyError {
    BookifyError::InternalError(message.to_string())
}
