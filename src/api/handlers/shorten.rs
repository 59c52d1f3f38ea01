//! Handler for the link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a long URL, or returns the key it already has.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "short_url": "http://localhost:8080/aB3xY9z" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: a new key was allocated
/// - **200 OK**: the URL was already shortened; the existing key is returned
/// - **400 Bad Request**: malformed JSON, missing or empty `url`
/// - **503 Service Unavailable**: no free key within the retry budget
/// - **504 Gateway Timeout**: the request deadline elapsed
/// - **500 Internal Server Error**: storage failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let allocation = state
        .allocation_service
        .shorten_until(&payload.url, state.deadline())
        .await?;

    let status = if allocation.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse {
            short_url: allocation.key.to_url(&state.base_url),
        }),
    ))
}
