//! Concurrent multi-source aggregation
//!
//! Fans the three category queries out as independent tasks and joins all of
//! them. A failed, panicking or slow category never cancels its siblings.

use std::any::Any;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, Span, error, info, info_span, warn};

use crate::models::{
    AggregationResult, AttractionQuery, Category, FlightQuery, HotelQuery, SourceOutcome,
};
use crate::search::{RawResponse, SearchProvider, SearchQuery, SourceError, normalize};

type Normalizer<T> = fn(RawResponse) -> Result<Vec<T>, SourceError>;

/// Runs the per-category search pipelines concurrently
pub struct Aggregator {
    provider: Arc<dyn SearchProvider>,
    span: Span,
}

impl Aggregator {
    pub fn new(provider: Arc<dyn SearchProvider>, span: Span) -> Self {
        Self { provider, span }
    }

    /// Query all three categories and wait until each reaches a terminal state
    pub async fn aggregate(
        &self,
        flights: FlightQuery,
        hotels: HotelQuery,
        attractions: AttractionQuery,
    ) -> AggregationResult {
        let flights_task = self.spawn(SearchQuery::Flights(flights), normalize::flights);
        let hotels_task = self.spawn(SearchQuery::Hotels(hotels), normalize::hotels);
        let attractions_task =
            self.spawn(SearchQuery::Attractions(attractions), normalize::attractions);

        let (flights, hotels, attractions) =
            tokio::join!(flights_task, hotels_task, attractions_task);

        let result = AggregationResult {
            flights: settle(Category::Flights, flights),
            hotels: settle(Category::Hotels, hotels),
            attractions: settle(Category::Attractions, attractions),
        };

        self.span.in_scope(|| {
            info!(
                flights = result.flights.len(),
                hotels = result.hotels.len(),
                attractions = result.attractions.len(),
                failed = [
                    result.flights.is_error(),
                    result.hotels.is_error(),
                    result.attractions.is_error()
                ]
                .iter()
                .filter(|failed| **failed)
                .count(),
                "Aggregation complete"
            );
        });

        result
    }

    fn spawn<T: Send + 'static>(
        &self,
        query: SearchQuery,
        normalize: Normalizer<T>,
    ) -> JoinHandle<SourceOutcome<T>> {
        let provider = Arc::clone(&self.provider);
        let category = query.category();
        let span = info_span!(parent: &self.span, "source", %category);

        tokio::spawn(
            async move {
                let outcome: SourceOutcome<T> =
                    provider.search(&query).await.and_then(normalize).into();

                match &outcome {
                    SourceOutcome::Records(records) => {
                        info!("Found {} {}", records.len(), category);
                    }
                    SourceOutcome::Error(err) => {
                        warn!(kind = ?err.kind, "Failed to get {}: {}", category, err.message);
                    }
                }

                outcome
            }
            .instrument(span),
        )
    }
}

/// Turn a task that died before producing an outcome into that category's error
fn settle<T>(category: Category, joined: Result<SourceOutcome<T>, JoinError>) -> SourceOutcome<T> {
    joined.unwrap_or_else(|join_error| {
        let message = if join_error.is_panic() {
            format!(
                "unexpected fault: {}",
                panic_message(join_error.into_panic().as_ref())
            )
        } else {
            "query task was cancelled".to_string()
        };

        error!(category = %category, message = %message, "Source task failed");
        SourceOutcome::Error(SourceError::fault(category, message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("task panicked")
}
