//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::domain::entities::ShortKey;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its original URL.
///
/// # Endpoint
///
/// `GET /{short_key}`
///
/// # Request Flow
///
/// 1. Reject strings that are not well-formed keys (404, no lookup)
/// 2. Check cache for the URL
/// 3. On cache miss, resolve through the allocation service
/// 4. Asynchronously populate the cache
/// 5. Return 301 Moved Permanently
///
/// # Errors
///
/// Returns 404 Not Found if the key was never persisted.
/// Returns 500 if the store fails, 504 if the request deadline elapses.
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Ok(key) = ShortKey::parse(short_key) else {
        return Err(AppError::not_found("Short link not found"));
    };

    let long_url = match state.cache.get_url(key.as_str()).await {
        Ok(Some(cached_url)) => cached_url,
        Ok(None) => {
            let long_url = state
                .allocation_service
                .resolve_until(&key, state.deadline())
                .await
                .inspect_err(|_| debug!(key = %key, "Short key not resolved"))?;

            // Bindings never change, so the cache write can trail the response.
            let cache = state.cache.clone();
            let url = long_url.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_url(key.as_str(), &url).await {
                    warn!("Failed to cache URL: {}", e);
                }
            });

            long_url
        }
        Err(e) => {
            error!("Cache error: {}", e);
            state
                .allocation_service
                .resolve_until(&key, state.deadline())
                .await?
        }
    };

    let location = HeaderValue::try_from(long_url)
        .map_err(|_| AppError::internal("Stored URL is not a valid Location header"))?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
