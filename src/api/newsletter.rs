//! Newsletter subscription endpoint.
//!
//! Pure forwarding to the configured mailing-list API; no local state.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::contact::looks_like_email;
use super::{success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterAccepted {
    pub subscribed: bool,
}

/// POST /api/newsletter - Subscribe an address to the mailing list.
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(request): Json<NewsletterRequest>,
) -> ApiResult<NewsletterAccepted> {
    if !looks_like_email(&request.email) {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    let Some(api_url) = state.config.newsletter_api_url.as_deref() else {
        tracing::error!("Newsletter API is not configured");
        return Err(AppError::ServiceUnavailable(
            "Newsletter signup is unavailable right now".to_string(),
        ));
    };

    let mut outbound = state
        .http
        .post(api_url)
        .json(&json!({ "email": request.email.trim() }));
    if let Some(key) = state.config.newsletter_api_key.as_deref() {
        outbound = outbound.bearer_auth(key);
    }

    let response = outbound.send().await.map_err(|err| {
        tracing::error!(error = %err, "Newsletter forward failed");
        AppError::Upstream("Newsletter signup failed. Please try again".to_string())
    })?;

    if !response.status().is_success() {
        tracing::error!(status = %response.status(), "Mailing-list API rejected subscription");
        return Err(AppError::Upstream(
            "Newsletter signup failed. Please try again".to_string(),
        ));
    }

    tracing::info!("Newsletter subscription forwarded");
    success(NewsletterAccepted { subscribed: true })
}
