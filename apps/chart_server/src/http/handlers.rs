use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use log::{info, warn};
use natal_chart::BirthData;

use super::dto::{GenerateMapRequest, GenerateMapResponse, HealthResponse};
use super::error::AppError;
use super::state::AppState;

pub const INVALID_BODY: &str = "Invalid request body";

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/generate-map
///
/// Validates the birth data, runs the chart pipeline and returns the
/// interpreted chart. Dropping this future (client gone) cancels any
/// lookup still in flight.
pub async fn generate_map(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMapRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable chart request: {}", rejection.body_text());
        AppError::BadRequest(INVALID_BODY.to_string())
    })?;

    let birth = BirthData::from_fields(
        request.name.as_deref(),
        request.dob.as_deref(),
        request.time.as_deref(),
        request.city.as_deref(),
        request.state.as_deref(),
    )?;

    info!("Generating chart for {} ({})", birth.name, birth.place_query());
    let chart = state.charts.generate(&birth).await?;

    Ok(Json(GenerateMapResponse::from(&chart)).into_response())
}

/// Any method other than POST on the chart route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
