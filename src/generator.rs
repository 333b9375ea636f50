//! Narrative itinerary generation
//!
//! The planner hands the rendered flight, hotel and attraction blocks to an
//! [`ItineraryGenerator`]. [`GeminiGenerator`] is the production implementation
//! backed by the Gemini `generateContent` REST endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::config::GeneratorConfig;
use crate::models::query::DATE_FORMAT;
use crate::{ItineraryError, Result};

/// Errors raised while producing the narrative
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The request never produced a response
    #[error("request to generator failed: {message}")]
    Request { message: String },

    /// The generator answered with a non-success status
    #[error("generator returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response body could not be decoded
    #[error("malformed generator response: {message}")]
    Payload { message: String },

    /// The response decoded but contained no text
    #[error("generator returned no itinerary text")]
    EmptyResponse,
}

/// Everything the generator needs to write an itinerary
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryPrompt {
    pub flights_text: String,
    pub hotels_text: String,
    pub attractions_text: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

impl ItineraryPrompt {
    /// Number of nights between check-in and check-out
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }

    /// Assemble the instruction text sent to the model
    #[must_use]
    pub fn to_instructions(&self) -> String {
        format!(
            "You are an expert travel planner. Using only the options listed below, \
             write a day-by-day itinerary for a stay from {check_in} to {check_out} \
             ({nights} nights).\n\
             Recommend one flight and one hotel and explain the choice briefly. \
             Spread the attractions across the days, group nearby sights together \
             and keep the links from the listings. If a section reports an error \
             or has no information, say so and plan around it.\n\n\
             {flights}\n\n{hotels}\n\n{attractions}\n",
            check_in = self.check_in_date.format(DATE_FORMAT),
            check_out = self.check_out_date.format(DATE_FORMAT),
            nights = self.nights(),
            flights = self.flights_text,
            hotels = self.hotels_text,
            attractions = self.attractions_text,
        )
    }
}

/// Turns rendered travel options into narrative text
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &ItineraryPrompt,
    ) -> std::result::Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Gemini REST client
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    endpoint: String,
    span: Span,
}

impl GeminiGenerator {
    /// Create a new generator; `span` is the parent span its log events are recorded under
    pub fn new(config: &GeneratorConfig, span: Span) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ItineraryError::config("Generator API key is not configured"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SmartItinerary/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ItineraryError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            span,
        })
    }

    async fn request(
        &self,
        prompt: &ItineraryPrompt,
    ) -> std::result::Result<String, GenerationError> {
        let instructions = prompt.to_instructions();
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart {
                    text: &instructions,
                }],
            }],
        };

        debug!("Sending prompt of {} characters", instructions.chars().count());
        let start_time = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Request {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| GenerationError::Request {
            message: format!("failed to read response body: {}", e.without_url()),
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| GenerationError::Payload {
                message: e.to_string(),
            })?;

        let text = decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        let elapsed = start_time.elapsed();
        info!(
            "Generated itinerary of {} characters in {:.3}s",
            text.chars().count(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 60 {
            warn!("Slow generator response: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(text)
    }
}

#[async_trait]
impl ItineraryGenerator for GeminiGenerator {
    async fn generate(
        &self,
        prompt: &ItineraryPrompt,
    ) -> std::result::Result<String, GenerationError> {
        let span = info_span!(parent: &self.span, "generate");
        self.request(prompt).instrument(span).await
    }
}
