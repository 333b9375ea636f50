//! Response normalization
//!
//! Maps raw provider responses into flight, hotel and attraction records,
//! filling per-field defaults for missing data.

use tracing::{debug, error, warn};

use super::raw::{
    RawAttraction, RawAttractionResponse, RawFlightOption, RawFlightResponse, RawHotelProperty,
    RawHotelResponse,
};
use super::{RawResponse, SourceError, SourceErrorKind};
use crate::models::{AttractionRecord, Category, FlightRecord, HotelRecord};

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_PRICE: &str = "0";
const DEFAULT_HOTEL_NAME: &str = "Unknown Name";
const DEFAULT_HOTEL_DESCRIPTION: &str = "unknown description";

type Normalized<T> = Result<Vec<T>, SourceError>;

fn unexpected(expected: Category, raw: &RawResponse) -> SourceError {
    SourceError::payload(
        expected,
        format!("expected a {expected} payload, got {}", raw.category()),
    )
}

/// An `error` field in a successful response, logged like a failed request
fn reported_error(category: Category, message: String) -> SourceError {
    let err = SourceError::provider(category, message);
    error!(
        category = %category,
        kind = ?SourceErrorKind::Provider,
        message = %err.message,
        "search request failed"
    );
    err
}

/// Normalize a flights response
pub fn flights(raw: RawResponse) -> Normalized<FlightRecord> {
    match raw {
        RawResponse::Flights(response) => normalize_flights(response),
        other => Err(unexpected(Category::Flights, &other)),
    }
}

/// Normalize a hotels response
pub fn hotels(raw: RawResponse) -> Normalized<HotelRecord> {
    match raw {
        RawResponse::Hotels(response) => normalize_hotels(response),
        other => Err(unexpected(Category::Hotels, &other)),
    }
}

/// Normalize an attractions response
pub fn attractions(raw: RawResponse) -> Normalized<AttractionRecord> {
    match raw {
        RawResponse::Attractions(response) => normalize_attractions(response),
        other => Err(unexpected(Category::Attractions, &other)),
    }
}

fn normalize_flights(response: RawFlightResponse) -> Normalized<FlightRecord> {
    if let Some(message) = response.error {
        return Err(reported_error(Category::Flights, message));
    }

    if response.best_flights.is_empty() {
        warn!("Flight search returned no options");
        return Ok(Vec::new());
    }

    let records: Vec<FlightRecord> = response
        .best_flights
        .into_iter()
        .filter_map(flight_record)
        .collect();

    debug!("Normalized {} flights", records.len());
    Ok(records)
}

/// Options without legs are skipped: no stop count can be derived for them
fn flight_record(option: RawFlightOption) -> Option<FlightRecord> {
    let first = option.flights.first()?;
    let last = option.flights.last()?;

    let departure_time = first
        .departure_airport
        .as_ref()
        .and_then(|airport| airport.time.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let (destination_airport, arrival_time) = match &last.arrival_airport {
        Some(airport) => (airport.name.clone(), airport.time.clone()),
        None => (None, None),
    };

    Some(FlightRecord {
        destination_airport: destination_airport.unwrap_or_else(|| UNKNOWN.to_string()),
        duration_minutes: option.total_duration.unwrap_or(0),
        stops: u32::try_from(option.flights.len() - 1).unwrap_or(u32::MAX),
        departure_time,
        arrival_time: arrival_time.unwrap_or_else(|| UNKNOWN.to_string()),
        price: option
            .price
            .map_or_else(|| DEFAULT_PRICE.to_string(), |price| price.to_string()),
    })
}

fn normalize_hotels(response: RawHotelResponse) -> Normalized<HotelRecord> {
    if let Some(message) = response.error {
        return Err(reported_error(Category::Hotels, message));
    }

    if response.properties.is_empty() {
        warn!("Hotel search returned no properties");
        return Ok(Vec::new());
    }

    let records: Vec<HotelRecord> = response.properties.into_iter().map(hotel_record).collect();
    debug!("Normalized {} hotels", records.len());
    Ok(records)
}

fn hotel_record(property: RawHotelProperty) -> HotelRecord {
    HotelRecord {
        name: property
            .name
            .unwrap_or_else(|| DEFAULT_HOTEL_NAME.to_string()),
        description: property
            .description
            .unwrap_or_else(|| DEFAULT_HOTEL_DESCRIPTION.to_string()),
        cost_per_night: property
            .rate_per_night
            .and_then(|rate| rate.lowest)
            .map_or_else(|| NOT_AVAILABLE.to_string(), |lowest| lowest.to_string()),
        rating: property.overall_rating.unwrap_or(0.0),
        link: property.link.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn normalize_attractions(response: RawAttractionResponse) -> Normalized<AttractionRecord> {
    if let Some(message) = response.error {
        return Err(reported_error(Category::Attractions, message));
    }

    if response.locations.is_empty() {
        warn!("Attraction search returned no locations");
        return Ok(Vec::new());
    }

    let records: Vec<AttractionRecord> = response
        .locations
        .into_iter()
        .map(attraction_record)
        .collect();
    debug!("Normalized {} attractions", records.len());
    Ok(records)
}

fn attraction_record(attraction: RawAttraction) -> AttractionRecord {
    AttractionRecord {
        name: attraction.title.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        description: attraction
            .description
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        location: attraction.location.unwrap_or_else(|| UNKNOWN.to_string()),
        rating: attraction.rating.unwrap_or(0.0),
        link: attraction.link.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}
