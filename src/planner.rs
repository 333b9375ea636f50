//! Itinerary planning entry point
//!
//! Aggregates the three categories, renders them and, when flights and hotels
//! both produced records, asks the generator for the narrative.

use std::fmt;
use std::sync::Arc;
use tracing::{Instrument, Span, error, info, info_span, warn};

use crate::aggregator::Aggregator;
use crate::generator::{ItineraryGenerator, ItineraryPrompt};
use crate::models::PlanRequest;
use crate::render::render;
use crate::{ItineraryError, Result};

/// Message returned when flight or hotel data is unavailable
pub const INSUFFICIENT_DATA_MESSAGE: &str = "No flights or hotels found for the given criteria";

/// Lifecycle of one planning request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    Received,
    Querying,
    Rendering,
    Blocked,
    Generating,
    Done,
    GenerationFailed,
}

impl PlanStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlanStage::Received => "received",
            PlanStage::Querying => "querying",
            PlanStage::Rendering => "rendering",
            PlanStage::Blocked => "blocked",
            PlanStage::Generating => "generating",
            PlanStage::Done => "done",
            PlanStage::GenerationFailed => "generation_failed",
        }
    }
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ItineraryPlanner {
    aggregator: Aggregator,
    generator: Arc<dyn ItineraryGenerator>,
    span: Span,
}

impl ItineraryPlanner {
    pub fn new(aggregator: Aggregator, generator: Arc<dyn ItineraryGenerator>, span: Span) -> Self {
        Self {
            aggregator,
            generator,
            span,
        }
    }

    /// Produce an itinerary for a validated request
    pub async fn plan(&self, request: PlanRequest) -> Result<String> {
        let span = info_span!(
            parent: &self.span,
            "plan",
            from = %request.flights.departure_airport(),
            to = %request.flights.arrival_airport(),
            city = %request.hotels.city(),
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: PlanRequest) -> Result<String> {
        info!(stage = %PlanStage::Received, "Planning itinerary");
        let PlanRequest {
            flights,
            hotels,
            attractions,
        } = request;
        let check_in_date = hotels.check_in_date();
        let check_out_date = hotels.check_out_date();

        info!(stage = %PlanStage::Querying, "Querying travel sources");
        let result = self.aggregator.aggregate(flights, hotels, attractions).await;

        info!(stage = %PlanStage::Rendering, "Rendering travel options");
        let prompt = ItineraryPrompt {
            flights_text: render(&result.flights),
            hotels_text: render(&result.hotels),
            attractions_text: render(&result.attractions),
            check_in_date,
            check_out_date,
        };

        if !result.flights.has_records() || !result.hotels.has_records() {
            warn!(
                stage = %PlanStage::Blocked,
                flights = result.flights.len(),
                hotels = result.hotels.len(),
                "Not enough data to plan an itinerary"
            );
            return Err(ItineraryError::insufficient_data(INSUFFICIENT_DATA_MESSAGE));
        }

        info!(stage = %PlanStage::Generating, "Generating itinerary");
        match self.generator.generate(&prompt).await {
            Ok(itinerary) => {
                info!(stage = %PlanStage::Done, "Itinerary generated");
                Ok(itinerary)
            }
            Err(err) => {
                error!(
                    stage = %PlanStage::GenerationFailed,
                    error = %err,
                    "Itinerary generation failed"
                );
                Err(err.into())
            }
        }
    }
}
