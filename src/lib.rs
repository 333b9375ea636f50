//! `SmartItinerary` - AI travel itinerary service
//!
//! This library queries flights, hotels and attractions concurrently,
//! normalizes and renders the results, and hands them to a narrative
//! generator that writes the itinerary.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod models;
pub mod planner;
pub mod render;
pub mod search;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use api::AppState;
pub use config::AppConfig;
pub use error::ItineraryError;
pub use generator::{GeminiGenerator, GenerationError, ItineraryGenerator, ItineraryPrompt};
pub use logging::LoggingHandle;
pub use models::{AggregationResult, Category, PlanRequest, SourceOutcome};
pub use planner::ItineraryPlanner;
pub use search::{SearchProvider, SerpApiClient, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ItineraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
