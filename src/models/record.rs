//! Normalized travel records
//!
//! Records are only built by the response normalizer and never mutated afterwards.

use serde::Serialize;

/// One bookable flight option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Name of the airport the last leg lands at
    pub destination_airport: String,
    /// Total travel time in minutes
    pub duration_minutes: u64,
    /// Number of stops (legs - 1)
    pub stops: u32,
    /// Departure time of the first leg, as reported by the provider
    pub departure_time: String,
    /// Arrival time of the last leg, as reported by the provider
    pub arrival_time: String,
    /// Price in the provider's currency
    pub price: String,
}

/// One hotel property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelRecord {
    pub name: String,
    pub description: String,
    /// Lowest nightly rate, "N/A" when unknown
    pub cost_per_night: String,
    /// Overall guest rating (0.0 when unknown)
    pub rating: f64,
    pub link: String,
}

/// One tourist attraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionRecord {
    pub name: String,
    pub description: String,
    pub location: String,
    pub rating: f64,
    pub link: String,
}
