//! Shared fixtures for unit tests

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

use crate::generator::{GenerationError, ItineraryGenerator, ItineraryPrompt};
use crate::models::query::parse_date;
use crate::models::{AttractionQuery, Category, FlightQuery, HotelQuery, PlanRequest};
use crate::search::{RawResponse, SearchProvider, SearchQuery, SourceError};

pub fn flight_query() -> FlightQuery {
    FlightQuery::new(
        "JFK",
        "LAX",
        parse_date("outbound_date", "2026-11-20").unwrap(),
        parse_date("return_date", "2026-11-27").unwrap(),
    )
    .unwrap()
}

pub fn hotel_query() -> HotelQuery {
    HotelQuery::new(
        "Los Angeles",
        parse_date("check_in_date", "2026-11-20").unwrap(),
        parse_date("check_out_date", "2026-11-27").unwrap(),
        "4,5".parse().unwrap(),
    )
    .unwrap()
}

pub fn attraction_query() -> AttractionQuery {
    AttractionQuery::new("Los Angeles popular attractions").unwrap()
}

pub fn plan_request() -> PlanRequest {
    PlanRequest {
        flights: flight_query(),
        hotels: hotel_query(),
        attractions: attraction_query(),
    }
}

pub fn flights_body() -> Value {
    json!({"best_flights": [{
        "flights": [{
            "departure_airport": {"name": "John F. Kennedy International Airport", "time": "2026-11-20 08:00"},
            "arrival_airport": {"name": "Los Angeles International Airport", "time": "2026-11-20 11:30"}
        }],
        "total_duration": 330,
        "price": 289
    }]})
}

pub fn hotels_body() -> Value {
    json!({"properties": [{
        "name": "Hotel Figueroa",
        "description": "Restored 1926 landmark in downtown Los Angeles",
        "rate_per_night": {"lowest": "$310"},
        "overall_rating": 4.4,
        "link": "https://figueroa.example"
    }]})
}

pub fn attractions_body() -> Value {
    json!({"locations": [{
        "title": "Griffith Observatory",
        "description": "Observatory with views of the Hollywood sign",
        "location": "Los Angeles, California",
        "rating": 4.8,
        "link": "https://griffith.example"
    }]})
}

/// What the scripted provider does for one category
#[derive(Clone)]
pub enum Script {
    Respond(Value),
    Fail(String),
    Panic,
}

/// Provider answering each category from a fixed script
pub struct ScriptedProvider {
    pub flights: Script,
    pub hotels: Script,
    pub attractions: Script,
    /// When set, every search waits here until all three are in flight
    pub barrier: Option<Arc<Barrier>>,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(flights: Script, hotels: Script, attractions: Script) -> Self {
        Self {
            flights,
            hotels,
            attractions,
            barrier: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn all_ok() -> Self {
        Self::new(
            Script::Respond(flights_body()),
            Script::Respond(hotels_body()),
            Script::Respond(attractions_body()),
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        let category = query.category();
        let script = match category {
            Category::Flights => &self.flights,
            Category::Hotels => &self.hotels,
            Category::Attractions => &self.attractions,
        };

        match script {
            Script::Respond(body) => Ok(RawResponse::decode(category, body.to_string().as_bytes())
                .expect("fixture bodies decode")),
            Script::Fail(message) => Err(SourceError::transport(category, message.clone())),
            Script::Panic => panic!("scripted {category} failure"),
        }
    }
}

/// Generator returning a fixed text, or failing
pub struct StaticGenerator {
    pub reply: Result<String, String>,
    pub prompts: std::sync::Mutex<Vec<ItineraryPrompt>>,
}

impl StaticGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ItineraryGenerator for StaticGenerator {
    async fn generate(&self, prompt: &ItineraryPrompt) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply
            .clone()
            .map_err(|message| GenerationError::Provider { status: 500, message })
    }
}
