//! Per-source outcomes and the aggregated result of one request

use super::{AttractionRecord, FlightRecord, HotelRecord};
use crate::search::SourceError;

/// Result of one category's fetch and normalize step
///
/// An empty record list means the search succeeded but found nothing; it is
/// never used to stand in for an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    Records(Vec<T>),
    Error(SourceError),
}

impl<T> SourceOutcome<T> {
    /// Records of a successful search, `None` on error
    #[must_use]
    pub fn records(&self) -> Option<&[T]> {
        match self {
            SourceOutcome::Records(records) => Some(records),
            SourceOutcome::Error(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&SourceError> {
        match self {
            SourceOutcome::Records(_) => None,
            SourceOutcome::Error(err) => Some(err),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, SourceOutcome::Error(_))
    }

    /// True when the search succeeded and returned at least one record
    #[must_use]
    pub fn has_records(&self) -> bool {
        self.records().is_some_and(|records| !records.is_empty())
    }

    /// Number of records, zero on error
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().map_or(0, <[T]>::len)
    }
}

impl<T> From<Result<Vec<T>, SourceError>> for SourceOutcome<T> {
    fn from(result: Result<Vec<T>, SourceError>) -> Self {
        match result {
            Ok(records) => SourceOutcome::Records(records),
            Err(err) => SourceOutcome::Error(err),
        }
    }
}

/// Outcomes of all three categories for one request
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub flights: SourceOutcome<FlightRecord>,
    pub hotels: SourceOutcome<HotelRecord>,
    pub attractions: SourceOutcome<AttractionRecord>,
}
