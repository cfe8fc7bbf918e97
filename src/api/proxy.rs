//! GraphQL reverse proxy endpoint.
//!
//! Forwards client GraphQL requests to the commerce endpoint while
//! injecting the access token server-side, so the token never ships to
//! the browser. Upstream status and body pass through untouched.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::commerce::CommerceError;
use crate::errors::AppError;
use crate::AppState;

/// POST /api/graphql - Forward a GraphQL request to the commerce platform.
pub async fn proxy_graphql(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    if body.get("query").and_then(Value::as_str).is_none() {
        return Err(AppError::BadRequest(
            "Request body must carry a query".to_string(),
        ));
    }

    match state.commerce.forward_raw(body).await {
        Ok((status, payload)) => {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Ok((status, Json(payload)).into_response())
        }
        Err(CommerceError::MissingToken) => Err(AppError::ServiceUnavailable(
            "Service is not available right now".to_string(),
        )),
        Err(err) => {
            tracing::error!(error = %err, "GraphQL proxy request failed");
            Err(AppError::Network(
                "Please check your connection and try again".to_string(),
            ))
        }
    }
}
