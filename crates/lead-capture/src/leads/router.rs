use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::LeadRequest;
use super::mailer::EmailSender;
use super::service::{LeadService, LeadServiceError};
use super::validation::LeadValidationError;

pub const LEAD_ROUTE: &str = "/api/report-lead";

/// Router builder exposing the report lead endpoint.
pub fn lead_router<E>(service: Arc<LeadService<E>>) -> Router
where
    E: EmailSender + 'static,
{
    Router::new()
        .route(LEAD_ROUTE, post(submit_lead_handler::<E>))
        .with_state(service)
}

pub(crate) async fn submit_lead_handler<E>(
    State(service): State<Arc<LeadService<E>>>,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> Response
where
    E: EmailSender + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return validation_response(&LeadValidationError::Body(rejection.body_text()));
        }
    };

    match service.capture(request).await {
        Ok(_) => {
            let payload = json!({
                "success": true,
                "message": "Lead captured successfully",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(LeadServiceError::Validation(error)) => validation_response(&error),
        Err(other) => {
            error!(error = ?error_chain(&other), "error handling lead");
            let payload = json!({ "error": "Failed to process request" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn validation_response(error: &LeadValidationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
        "details": error.details(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn error_chain(error: &dyn std::error::Error) -> Vec<String> {
    let mut chain = vec![error.to_string()];
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(cause.to_string());
        current = cause.source();
    }
    chain
}
