//! HTTP API module.
//!
//! Cart endpoints drive the synchronization store; the remaining endpoints
//! are thin glue (contact form, newsletter, sitemap, GraphQL proxy).

mod cart;
mod contact;
mod newsletter;
mod proxy;
mod sitemap;

pub use cart::*;
pub use contact::*;
pub use newsletter::*;
pub use proxy::*;
pub use sitemap::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    /// User-facing message produced by the operation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, notice: Option<String>) -> Self {
        Self {
            success: true,
            data,
            notice,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data, None))
}

/// Create a successful API response carrying a user-facing notice.
pub fn success_with_notice<T: Serialize>(data: T, notice: Option<String>) -> ApiResult<T> {
    Ok(ApiResponse::new(data, notice))
}
