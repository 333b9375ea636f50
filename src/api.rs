//! HTTP API
//!
//! `POST /plan-itinerary` validates the request body into a [`PlanRequest`] and
//! runs the planner. Failures are answered with `{"detail": "..."}`.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::models::query::parse_date;
use crate::models::{AttractionQuery, FlightQuery, HotelClassFilter, HotelQuery, PlanRequest};
use crate::planner::ItineraryPlanner;
use crate::{ItineraryError, VERSION};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<ItineraryPlanner>,
}

#[derive(Debug, Deserialize)]
pub struct ApiFlightRequest {
    pub departure_airport_code: String,
    pub arrival_airport_code: String,
    pub outbound_date: String,
    #[serde(alias = "inbound_date")]
    pub return_date: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiHotelRequest {
    pub city: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub hotel_class: ApiHotelClass,
}

/// `hotel_class` as sent by clients: `"4,5"` or `4`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiHotelClass {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct ApiSightsRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanItineraryRequest {
    pub flight_request: ApiFlightRequest,
    pub hotel_request: ApiHotelRequest,
    pub sights_request: ApiSightsRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanItineraryResponse {
    pub itinerary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl TryFrom<ApiHotelClass> for HotelClassFilter {
    type Error = ItineraryError;

    fn try_from(value: ApiHotelClass) -> Result<Self, Self::Error> {
        match value {
            ApiHotelClass::Text(text) => text.parse(),
            ApiHotelClass::Number(number) => {
                let class = u8::try_from(number).map_err(|_| {
                    ItineraryError::validation(format!(
                        "hotel_class must be between {} and {}, got {number}",
                        HotelClassFilter::MIN,
                        HotelClassFilter::MAX
                    ))
                })?;
                HotelClassFilter::new([class])
            }
        }
    }
}

impl TryFrom<PlanItineraryRequest> for PlanRequest {
    type Error = ItineraryError;

    fn try_from(body: PlanItineraryRequest) -> Result<Self, Self::Error> {
        let PlanItineraryRequest {
            flight_request: flight,
            hotel_request: hotel,
            sights_request: sights,
        } = body;

        let flights = FlightQuery::new(
            &flight.departure_airport_code,
            &flight.arrival_airport_code,
            parse_date("outbound_date", &flight.outbound_date)?,
            parse_date("return_date", &flight.return_date)?,
        )?;
        let hotels = HotelQuery::new(
            &hotel.city,
            parse_date("check_in_date", &hotel.check_in_date)?,
            parse_date("check_out_date", &hotel.check_out_date)?,
            hotel.hotel_class.try_into()?,
        )?;
        let attractions = AttractionQuery::new(&sights.query)?;

        Ok(PlanRequest {
            flights,
            hotels,
            attractions,
        })
    }
}

impl ItineraryError {
    /// HTTP status reported for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ItineraryError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ItineraryError::InsufficientData { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ItineraryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            detail: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/plan-itinerary", post(plan_itinerary))
        .route("/health", get(health))
        .with_state(state)
}

async fn plan_itinerary(
    State(state): State<AppState>,
    payload: Result<Json<PlanItineraryRequest>, JsonRejection>,
) -> Result<Json<PlanItineraryResponse>, ItineraryError> {
    let Json(body) =
        payload.map_err(|rejection| ItineraryError::validation(rejection.body_text()))?;
    let request = PlanRequest::try_from(body)?;

    let itinerary = state.planner.plan(request).await?;
    Ok(Json(PlanItineraryResponse { itinerary }))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
    })
}
