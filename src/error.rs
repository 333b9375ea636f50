//! Error types and handling for the itinerary service

use thiserror::Error;

use crate::generator::GenerationError;

/// Main error type for the itinerary service
#[derive(Error, Debug)]
pub enum ItineraryError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request validation errors, raised before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Flight or hotel data unavailable after aggregation
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    /// The narrative generator failed
    #[error("Generation error: {source}")]
    Generation {
        #[from]
        source: GenerationError,
    },
}

impl ItineraryError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new insufficient-data error
    pub fn insufficient_data<S: Into<String>>(message: S) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the service
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ItineraryError::Validation { .. } | ItineraryError::InsufficientData { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ItineraryError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ItineraryError::Validation { message } => format!("Invalid input: {message}"),
            ItineraryError::InsufficientData { message } => message.clone(),
            ItineraryError::Generation { source } => {
                format!("Failed to generate itinerary: {source}")
            }
        }
    }
}
