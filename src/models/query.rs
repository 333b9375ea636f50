//! Validated search queries
//!
//! Queries are built from boundary input and checked on construction, so a
//! malformed airport code or hotel class never reaches the network.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::{ItineraryError, Result};

/// Date format used by the request boundary and the search provider
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, naming the offending field on failure
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ItineraryError::validation(format!(
            "{field} must be a date in YYYY-MM-DD format, got '{value}'"
        ))
    })
}

fn airport_code(field: &str, code: &str) -> Result<String> {
    let code = code.trim();
    if code.chars().count() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ItineraryError::validation(format!(
            "{field} must be a 3-letter IATA code, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

fn non_blank(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ItineraryError::validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

/// Round-trip flight search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    departure_airport: String,
    arrival_airport: String,
    outbound_date: NaiveDate,
    return_date: NaiveDate,
}

impl FlightQuery {
    pub fn new(
        departure_airport: &str,
        arrival_airport: &str,
        outbound_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Result<Self> {
        let departure_airport = airport_code("departure_airport_code", departure_airport)?;
        let arrival_airport = airport_code("arrival_airport_code", arrival_airport)?;

        if return_date < outbound_date {
            return Err(ItineraryError::validation(format!(
                "return_date {return_date} is before outbound_date {outbound_date}"
            )));
        }

        Ok(Self {
            departure_airport,
            arrival_airport,
            outbound_date,
            return_date,
        })
    }

    #[must_use]
    pub fn departure_airport(&self) -> &str {
        &self.departure_airport
    }

    #[must_use]
    pub fn arrival_airport(&self) -> &str {
        &self.arrival_airport
    }

    #[must_use]
    pub fn outbound_date(&self) -> NaiveDate {
        self.outbound_date
    }

    #[must_use]
    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }
}

/// Star classes a hotel search is restricted to (2-5, one or more)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelClassFilter(Vec<u8>);

impl HotelClassFilter {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 5;

    /// Build a filter from star classes, rejecting empty sets and out-of-range values
    pub fn new(classes: impl IntoIterator<Item = u8>) -> Result<Self> {
        let mut unique = Vec::new();
        for class in classes {
            if !(Self::MIN..=Self::MAX).contains(&class) {
                return Err(ItineraryError::validation(format!(
                    "hotel_class must be between {} and {}, got {class}",
                    Self::MIN,
                    Self::MAX
                )));
            }
            if !unique.contains(&class) {
                unique.push(class);
            }
        }

        if unique.is_empty() {
            return Err(ItineraryError::validation(
                "hotel_class must name at least one star class",
            ));
        }

        Ok(Self(unique))
    }

    #[must_use]
    pub fn classes(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for HotelClassFilter {
    type Err = ItineraryError;

    fn from_str(s: &str) -> Result<Self> {
        let classes = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u8>().map_err(|_| {
                    ItineraryError::validation(format!(
                        "hotel_class must be a number or comma-separated numbers, got '{s}'"
                    ))
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Self::new(classes)
    }
}

impl fmt::Display for HotelClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// Hotel search for a stay in one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelQuery {
    city: String,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    hotel_class: HotelClassFilter,
}

impl HotelQuery {
    pub fn new(
        city: &str,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        hotel_class: HotelClassFilter,
    ) -> Result<Self> {
        let city = non_blank("city", city)?;

        if check_out_date <= check_in_date {
            return Err(ItineraryError::validation(format!(
                "check_out_date {check_out_date} must be after check_in_date {check_in_date}"
            )));
        }

        Ok(Self {
            city,
            check_in_date,
            check_out_date,
            hotel_class,
        })
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in_date
    }

    #[must_use]
    pub fn check_out_date(&self) -> NaiveDate {
        self.check_out_date
    }

    #[must_use]
    pub fn hotel_class(&self) -> &HotelClassFilter {
        &self.hotel_class
    }
}

/// Free-text attraction search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionQuery {
    query: String,
}

impl AttractionQuery {
    pub fn new(query: &str) -> Result<Self> {
        Ok(Self {
            query: non_blank("query", query)?,
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// One query of each category, as accepted by the planner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub flights: FlightQuery,
    pub hotels: HotelQuery,
    pub attractions: AttractionQuery,
}
