//! Search provider client for SerpApi integration
//!
//! One blocking query per category against the provider's `search.json`
//! endpoint. Every failure comes back as a [`SourceError`]; nothing is raised
//! past this boundary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use super::{RawResponse, SourceError};
use crate::config::SearchConfig;
use crate::models::query::DATE_FORMAT;
use crate::models::{AttractionQuery, Category, FlightQuery, HotelQuery};
use crate::{ItineraryError, Result};

/// Suffix appended to the city for hotel searches
pub const HOTEL_QUERY_SUFFIX: &str = " hotels and resorts";

/// A query for exactly one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Flights(FlightQuery),
    Hotels(HotelQuery),
    Attractions(AttractionQuery),
}

impl SearchQuery {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            SearchQuery::Flights(_) => Category::Flights,
            SearchQuery::Hotels(_) => Category::Hotels,
            SearchQuery::Attractions(_) => Category::Attractions,
        }
    }

    /// Provider parameters for this query, without the credential
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            SearchQuery::Flights(query) => vec![
                ("engine", "google_flights".to_string()),
                ("hl", "en".to_string()),
                ("departure_id", query.departure_airport().to_string()),
                ("arrival_id", query.arrival_airport().to_string()),
                (
                    "outbound_date",
                    query.outbound_date().format(DATE_FORMAT).to_string(),
                ),
                (
                    "return_date",
                    query.return_date().format(DATE_FORMAT).to_string(),
                ),
            ],
            SearchQuery::Hotels(query) => vec![
                ("engine", "google_hotels".to_string()),
                ("q", format!("{}{HOTEL_QUERY_SUFFIX}", query.city())),
                (
                    "check_in_date",
                    query.check_in_date().format(DATE_FORMAT).to_string(),
                ),
                (
                    "check_out_date",
                    query.check_out_date().format(DATE_FORMAT).to_string(),
                ),
                ("hotel_class", query.hotel_class().to_string()),
            ],
            SearchQuery::Attractions(query) => vec![
                ("engine", "tripadvisor".to_string()),
                ("q", query.query().to_string()),
                ("ssrc", "A".to_string()),
            ],
        }
    }
}

/// Source of raw travel data, one query at a time
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query and return the provider's decoded response
    async fn search(&self, query: &SearchQuery) -> std::result::Result<RawResponse, SourceError>;
}

/// Error body returned by the provider on failure
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: String,
}

/// HTTP client for the SerpApi search endpoint
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    span: Span,
}

impl SerpApiClient {
    /// Create a new client; `span` is the parent span its log events are recorded under
    pub fn new(config: &SearchConfig, span: Span) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ItineraryError::config("Search API key is not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SmartItinerary/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ItineraryError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            span,
        })
    }

    async fn fetch(&self, query: &SearchQuery) -> std::result::Result<RawResponse, SourceError> {
        let category = query.category();
        let url = format!("{}/search.json", self.base_url);
        let mut params = query.params();
        params.push(("api_key", self.api_key.clone()));

        debug!("Sending {} search request", category);
        let start_time = Instant::now();

        // `without_url` keeps the api_key query parameter out of error messages
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                SourceError::transport(category, format!("request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            SourceError::transport(
                category,
                format!("failed to read response body: {}", e.without_url()),
            )
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ProviderErrorBody>(&body)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    format!(
                        "HTTP {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown error")
                    )
                });
            return Err(SourceError::provider(category, message));
        }

        let raw = RawResponse::decode(category, &body).map_err(|e| {
            SourceError::payload(category, format!("malformed {category} response: {e}"))
        })?;

        let elapsed = start_time.elapsed();
        info!(
            "Received {} search response in {:.3}s",
            category,
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 10 {
            warn!("Slow {} search response: {:.3}s", category, elapsed.as_secs_f64());
        }

        Ok(raw)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &SearchQuery) -> std::result::Result<RawResponse, SourceError> {
        let category = query.category();
        let span = info_span!(parent: &self.span, "search", %category);

        let result = self.fetch(query).instrument(span.clone()).await;

        if let Err(err) = &result {
            span.in_scope(|| {
                error!(
                    category = %category,
                    kind = ?err.kind,
                    message = %err.message,
                    "search request failed"
                );
            });
        }

        result
    }
}
