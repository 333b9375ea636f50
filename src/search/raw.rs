//! Typed raw responses from the search provider
//!
//! Provider payloads vary in shape, so every field is optional and a field of
//! the wrong type is read as absent. A malformed item therefore still decodes
//! (with its fields missing) instead of failing the whole response.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::models::Category;

/// Deserialize a field, treating a value of the wrong shape as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list field; a non-list reads as empty and a malformed item as its default
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Deserialize the provider's `error` field; any non-null value is an error
///
/// A string is kept as the message, anything else as its JSON text.
fn provider_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(message) => Some(message),
        other => Some(other.to_string()),
    })
}

/// A number or string value, kept as the provider sent it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

/// `google_flights` engine response
#[derive(Debug, Default, Deserialize)]
pub struct RawFlightResponse {
    #[serde(default, deserialize_with = "provider_error")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub best_flights: Vec<RawFlightOption>,
}

/// One itinerary option made of one or more legs
#[derive(Debug, Default, Deserialize)]
pub struct RawFlightOption {
    #[serde(default, deserialize_with = "lenient_items")]
    pub flights: Vec<RawFlightLeg>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFlightLeg {
    #[serde(default, deserialize_with = "lenient")]
    pub departure_airport: Option<RawAirport>,
    #[serde(default, deserialize_with = "lenient")]
    pub arrival_airport: Option<RawAirport>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAirport {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,
}

/// `google_hotels` engine response
#[derive(Debug, Default, Deserialize)]
pub struct RawHotelResponse {
    #[serde(default, deserialize_with = "provider_error")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub properties: Vec<RawHotelProperty>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHotelProperty {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rate_per_night: Option<RawRate>,
    #[serde(default, deserialize_with = "lenient")]
    pub overall_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRate {
    #[serde(default, deserialize_with = "lenient")]
    pub lowest: Option<Scalar>,
}

/// `tripadvisor` engine response
#[derive(Debug, Default, Deserialize)]
pub struct RawAttractionResponse {
    #[serde(default, deserialize_with = "provider_error")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub locations: Vec<RawAttraction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAttraction {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<String>,
}

/// Raw provider response, one variant per category
#[derive(Debug)]
pub enum RawResponse {
    Flights(RawFlightResponse),
    Hotels(RawHotelResponse),
    Attractions(RawAttractionResponse),
}

impl RawResponse {
    /// Decode a response body as the payload of the given category
    pub fn decode(category: Category, body: &[u8]) -> serde_json::Result<Self> {
        Ok(match category {
            Category::Flights => RawResponse::Flights(serde_json::from_slice(body)?),
            Category::Hotels => RawResponse::Hotels(serde_json::from_slice(body)?),
            Category::Attractions => RawResponse::Attractions(serde_json::from_slice(body)?),
        })
    }

    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            RawResponse::Flights(_) => Category::Flights,
            RawResponse::Hotels(_) => Category::Hotels,
            RawResponse::Attractions(_) => Category::Attractions,
        }
    }
}
