//! HTTP request handlers for the HR engine API.
//!
//! Every handler tags its work with a fresh correlation id, turns body
//! rejections into the JSON error format and maps [`HrError`] through
//! [`ApiErrorResponse`].

mod employees;
mod leave;
mod payroll;
mod performance;
mod workflows;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{HrError, HrResult};

use super::request::HealthResponse;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
///
/// Domain routes live under `/api/v1`; `/health` sits at the root.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(employees::routes())
        .merge(leave::routes())
        .merge(payroll::routes())
        .merge(workflows::routes())
        .merge(performance::routes());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Starts request tracking for `operation`.
fn start(operation: &'static str) -> Uuid {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, operation, "Handling request");
    correlation_id
}

/// Unwraps a JSON body or builds the 400 response for its rejection.
fn read_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::bad_request(error).into_response())
        }
    }
}

/// Serialises a service result with `status`, or maps its error.
fn respond<T: Serialize>(correlation_id: Uuid, status: StatusCode, result: HrResult<T>) -> Response {
    match result {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response(),
        Err(err) => failure(correlation_id, err),
    }
}

/// 204 on success.
fn no_content(correlation_id: Uuid, result: HrResult<()>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => failure(correlation_id, err),
    }
}

fn failure(correlation_id: Uuid, err: HrError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

fn current_year() -> i32 {
    Utc::now().year()
}
