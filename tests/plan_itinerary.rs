//! End-to-end tests: real clients against mock providers, served by the real router

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use smart_itinerary::config::{GeneratorConfig, SearchConfig};
use smart_itinerary::{Aggregator, AppState, GeminiGenerator, ItineraryPlanner, SerpApiClient, web};
use tower::ServiceExt;
use tracing::Span;
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ITINERARY: &str = "## Day 1\nArrive at LAX and check in at Hotel Figueroa.\n\n## Day 2\nGriffith Observatory at sunset.";

struct Providers {
    serpapi: MockServer,
    gemini: MockServer,
}

impl Providers {
    async fn start() -> Self {
        Self {
            serpapi: MockServer::start().await,
            gemini: MockServer::start().await,
        }
    }

    async fn search(&self, engine: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", engine))
            .and(query_param("api_key", "serp-test-key"))
            .respond_with(response)
            .expect(1)
            .mount(&self.serpapi)
            .await;
    }

    async fn generator(&self, calls: u64) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/[^/]+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": ITINERARY}]}}]
            })))
            .expect(calls)
            .mount(&self.gemini)
            .await;
    }

    fn app(&self) -> axum::Router {
        let search = SearchConfig {
            api_key: Some("serp-test-key".to_string()),
            base_url: self.serpapi.uri(),
            timeout_seconds: 5,
        };
        let generator = GeneratorConfig {
            api_key: Some("gemini-test-key".to_string()),
            base_url: self.gemini.uri(),
            ..GeneratorConfig::default()
        };

        let provider = SerpApiClient::new(&search, Span::none()).unwrap();
        let generator = GeminiGenerator::new(&generator, Span::none()).unwrap();
        let aggregator = Aggregator::new(Arc::new(provider), Span::none());
        let planner = ItineraryPlanner::new(aggregator, Arc::new(generator), Span::none());

        web::app(AppState {
            planner: Arc::new(planner),
        })
    }
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn flights() -> Value {
    json!({"best_flights": [{
        "flights": [
            {
                "departure_airport": {"name": "John F. Kennedy International Airport", "id": "JFK", "time": "2026-11-20 08:00"},
                "arrival_airport": {"name": "Denver International Airport", "id": "DEN", "time": "2026-11-20 10:15"}
            },
            {
                "departure_airport": {"name": "Denver International Airport", "id": "DEN", "time": "2026-11-20 11:30"},
                "arrival_airport": {"name": "Los Angeles International Airport", "id": "LAX", "time": "2026-11-20 13:05"}
            }
        ],
        "total_duration": 485,
        "price": 312,
        "type": "Round trip"
    }]})
}

fn hotels() -> Value {
    json!({"properties": [{
        "type": "hotel",
        "name": "Hotel Figueroa",
        "description": "Restored 1926 landmark in downtown Los Angeles",
        "rate_per_night": {"lowest": "$310", "extracted_lowest": 310},
        "overall_rating": 4.4,
        "link": "https://figueroa.example"
    }]})
}

fn attractions() -> Value {
    json!({"locations": [{
        "title": "Griffith Observatory",
        "description": "Observatory with views of the Hollywood sign",
        "location": "Los Angeles, California",
        "rating": 4.8,
        "link": "https://griffith.example"
    }]})
}

fn request_body() -> String {
    json!({
        "flight_request": {
            "departure_airport_code": "jfk",
            "arrival_airport_code": "LAX",
            "outbound_date": "2026-11-20",
            "return_date": "2026-11-27"
        },
        "hotel_request": {
            "city": "Los Angeles",
            "check_in_date": "2026-11-20",
            "check_out_date": "2026-11-27",
            "hotel_class": "4,5"
        },
        "sights_request": {"query": "Los Angeles popular attractions"}
    })
    .to_string()
}

async fn plan(app: axum::Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/plan-itinerary")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(request_body()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_full_plan_returns_generated_itinerary() {
    let providers = Providers::start().await;
    providers.search("google_flights", ok(flights())).await;
    providers.search("google_hotels", ok(hotels())).await;
    providers.search("tripadvisor", ok(attractions())).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("Los Angeles International Airport"))
        .and(body_string_contains("🛑 **Stops:** 1"))
        .and(body_string_contains("Hotel Figueroa"))
        .and(body_string_contains("Griffith Observatory"))
        .and(body_string_contains("2026-11-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": ITINERARY}]}}]
        })))
        .expect(1)
        .mount(&providers.gemini)
        .await;

    let (status, body) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"itinerary": ITINERARY}));
}

#[tokio::test]
async fn test_hotel_query_uses_city_suffix_and_class_filter() {
    let providers = Providers::start().await;
    providers.search("google_flights", ok(flights())).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_hotels"))
        .and(query_param("q", "Los Angeles hotels and resorts"))
        .and(query_param("hotel_class", "4,5"))
        .respond_with(ok(hotels()))
        .expect(1)
        .mount(&providers.serpapi)
        .await;
    providers.search("tripadvisor", ok(attractions())).await;
    providers.generator(1).await;

    let (status, _) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_flight_provider_error_blocks_generation() {
    let providers = Providers::start().await;
    providers
        .search(
            "google_flights",
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key."})),
        )
        .await;
    providers.search("google_hotels", ok(hotels())).await;
    providers.search("tripadvisor", ok(attractions())).await;
    providers.generator(0).await;

    let (status, body) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "No flights or hotels found for the given criteria"})
    );
}

#[tokio::test]
async fn test_empty_flights_block_generation() {
    let providers = Providers::start().await;
    providers
        .search("google_flights", ok(json!({"search_metadata": {"status": "Success"}})))
        .await;
    providers.search("google_hotels", ok(hotels())).await;
    providers.search("tripadvisor", ok(attractions())).await;
    providers.generator(0).await;

    let (status, body) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "No flights or hotels found for the given criteria"})
    );
}

#[tokio::test]
async fn test_filtered_hotel_ratings_reach_generator() {
    let providers = Providers::start().await;
    providers.search("google_flights", ok(flights())).await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("engine", "google_hotels"))
        .and(query_param("hotel_class", "4,5"))
        .respond_with(ok(json!({"properties": [
            {"name": "Hotel Figueroa", "overall_rating": 4.4},
            {"name": "The Line Hotel"}
        ]})))
        .expect(1)
        .mount(&providers.serpapi)
        .await;
    providers.search("tripadvisor", ok(attractions())).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("⭐ **Rating:** 4.4"))
        .and(body_string_contains("The Line Hotel"))
        .and(body_string_contains("⭐ **Rating:** 0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": ITINERARY}]}}]
        })))
        .expect(1)
        .mount(&providers.gemini)
        .await;

    let (status, _) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_attraction_failure_still_plans() {
    let providers = Providers::start().await;
    providers.search("google_flights", ok(flights())).await;
    providers.search("google_hotels", ok(hotels())).await;
    providers
        .search("tripadvisor", ResponseTemplate::new(500))
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Error retrieving attractions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": ITINERARY}]}}]
        })))
        .expect(1)
        .mount(&providers.gemini)
        .await;

    let (status, body) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itinerary"], ITINERARY);
}

#[tokio::test]
async fn test_generator_failure_is_server_error() {
    let providers = Providers::start().await;
    providers.search("google_flights", ok(flights())).await;
    providers.search("google_hotels", ok(hotels())).await;
    providers.search("tripadvisor", ok(attractions())).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
        })))
        .mount(&providers.gemini)
        .await;

    let (status, body) = plan(providers.app()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("The model is overloaded."));
}
