//! Cart API endpoints.
//!
//! Thin HTTP wrappers over the cart synchronization store; the store owns
//! all state transitions and failure classification.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{success, success_with_notice, ApiResult};
use crate::cart::{CartSnapshot, Notice};
use crate::commerce::Cart;
use crate::errors::AppError;
use crate::AppState;

/// Cart state as exposed to the UI layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<Cart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    pub item_count: i64,
    pub loading: bool,
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            cart: snapshot.cart.clone(),
            cart_id: snapshot.cart_id.clone(),
            item_count: snapshot.cart.as_ref().map(Cart::item_count).unwrap_or(0),
            loading: snapshot.loading,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineRequest {
    pub merchandise_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountView {
    pub item_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub checkout_url: String,
}

fn notice_error(notice: Option<Notice>) -> AppError {
    match notice {
        Some(Notice::Validation(message)) => AppError::Validation(message),
        Some(n @ Notice::Network) | Some(n @ Notice::SyncIssue) => {
            AppError::Network(n.user_message())
        }
        Some(n @ Notice::CheckoutBlocked) => AppError::CheckoutBlocked(n.user_message()),
        Some(n) => AppError::ServiceUnavailable(n.user_message()),
        None => AppError::Internal("Cart operation failed".to_string()),
    }
}

/// Map a finished mutation to a response: desync recovery resolves to a
/// well-defined cart state and is reported as success with a notice, every
/// other failure becomes an error envelope.
fn mutation_response(state: &AppState, accepted: bool) -> ApiResult<CartView> {
    let snapshot = state.cart.snapshot();
    if accepted {
        return success(CartView::from(&snapshot));
    }

    match &snapshot.notice {
        Some(n @ Notice::CartRefreshed) | Some(n @ Notice::CartCleared) => {
            success_with_notice(CartView::from(&snapshot), Some(n.user_message()))
        }
        _ => Err(notice_error(snapshot.notice)),
    }
}

/// GET /api/cart - Current cart state.
pub async fn get_cart(State(state): State<AppState>) -> ApiResult<CartView> {
    let snapshot = state.cart.snapshot();
    let notice = snapshot.notice.as_ref().map(Notice::user_message);
    success_with_notice(CartView::from(&snapshot), notice)
}

/// POST /api/cart/load - Rehydrate the cart from the persisted identifier.
pub async fn load_cart(State(state): State<AppState>) -> ApiResult<CartView> {
    state.cart.load_cart().await;

    let snapshot = state.cart.snapshot();
    let notice = snapshot.notice.as_ref().map(Notice::user_message);
    success_with_notice(CartView::from(&snapshot), notice)
}

/// POST /api/cart/lines - Add merchandise to the cart.
pub async fn add_line(
    State(state): State<AppState>,
    Json(request): Json<AddLineRequest>,
) -> ApiResult<CartView> {
    if request.merchandise_id.trim().is_empty() {
        return Err(AppError::Validation(
            "merchandiseId is required".to_string(),
        ));
    }
    if request.quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be a positive integer".to_string(),
        ));
    }

    let accepted = state
        .cart
        .add_to_cart(&request.merchandise_id, request.quantity)
        .await;
    mutation_response(&state, accepted)
}

/// PUT /api/cart/lines/:id - Change a line's quantity.
pub async fn update_line(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
    Json(request): Json<UpdateLineRequest>,
) -> ApiResult<CartView> {
    if request.quantity < 1 {
        // Decrementing to zero is the caller's cue to remove the line instead.
        return Err(AppError::Validation(
            "quantity must be a positive integer".to_string(),
        ));
    }
    if state.cart.snapshot().cart.is_none() {
        return Err(AppError::NotFound("No active cart".to_string()));
    }

    let accepted = state.cart.update_line(&line_id, request.quantity).await;
    mutation_response(&state, accepted)
}

/// DELETE /api/cart/lines/:id - Remove a line from the cart.
pub async fn remove_line(
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> ApiResult<CartView> {
    if state.cart.snapshot().cart.is_none() {
        return Err(AppError::NotFound("No active cart".to_string()));
    }

    let accepted = state.cart.remove_line(&line_id).await;
    mutation_response(&state, accepted)
}

/// GET /api/cart/count - Item count for badge rendering.
pub async fn cart_count(State(state): State<AppState>) -> ApiResult<CountView> {
    success(CountView {
        item_count: state.cart.item_count(),
    })
}

/// POST /api/cart/checkout - Validated checkout handoff URL.
pub async fn checkout(State(state): State<AppState>) -> ApiResult<CheckoutView> {
    match state.cart.checkout() {
        Some(url) => success(CheckoutView {
            checkout_url: url.to_string(),
        }),
        None => Err(AppError::CheckoutBlocked(
            Notice::CheckoutBlocked.user_message(),
        )),
    }
}

/// DELETE /api/cart - Explicit user-initiated cart abandonment.
pub async fn clear_cart(State(state): State<AppState>) -> ApiResult<CartView> {
    state.cart.clear().await;
    success(CartView::from(&state.cart.snapshot()))
}
