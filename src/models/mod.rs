//! Data models for the itinerary service
//!
//! This module contains the core domain models organized by concern:
//! - Category: the closed set of travel-data sources
//! - Query: validated search queries built from request input
//! - Record: normalized flight, hotel and attraction records
//! - Outcome: per-source results and the aggregated view of all three

pub mod category;
pub mod outcome;
pub mod query;
pub mod record;

// Re-export all public types for convenient access
pub use category::Category;
pub use outcome::{AggregationResult, SourceOutcome};
pub use query::{AttractionQuery, FlightQuery, HotelClassFilter, HotelQuery, PlanRequest};
pub use record::{AttractionRecord, FlightRecord, HotelRecord};
