//! Route handlers for the quote API

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::AppState;

use super::requests::QuoteRequest;
use super::responses::{PlanResponse, QuoteErrorResponse, QuoteResponse};
use super::services::{self, QuoteError};

/// Build the quote API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quote", post(create_quote))
        .route("/api/options", get(list_options))
        .route("/api/plan", get(active_plan))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/invalidate", post(invalidate_cache))
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            QuoteError::InvalidDateRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_date_range")
            }
            QuoteError::Database { context } => {
                tracing::error!("Quote database error: {}", context);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
        };

        let body = QuoteErrorResponse {
            error_type: error_type.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Quote a parking stay
async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, QuoteError> {
    let selections = request.selections();
    let quote = services::build_quote(
        &state.db,
        &state.cache,
        request.start_date,
        request.end_date,
        &selections,
        request.number_of_people,
    )
    .await?;

    Ok(Json(QuoteResponse::from(quote)))
}

/// Active option catalog for form rendering
async fn list_options(State(state): State<AppState>) -> Result<Response, QuoteError> {
    let options = services::resolve_option_catalog(&state.db, &state.cache).await?;
    Ok(Json(&*options).into_response())
}

/// Active price plan with its tier table, for the admin calculator
async fn active_plan(State(state): State<AppState>) -> Result<Json<PlanResponse>, QuoteError> {
    let plan = services::resolve_active_plan(&state.db, &state.cache, None).await?;
    Ok(Json(PlanResponse::from(&*plan)))
}

/// Cache statistics for monitoring
async fn cache_stats(State(state): State<AppState>) -> Json<crate::cache::CacheStats> {
    Json(state.cache.stats())
}

/// Drop the cached plan and catalog so admin pricing edits take effect
/// immediately instead of on TTL expiry
async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}
