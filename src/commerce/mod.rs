//! Commerce platform API client.
//!
//! The commerce platform is the source of truth for cart contents, pricing,
//! and checkout. This module speaks its GraphQL endpoint over HTTP POST with
//! a static access token, and owns the failure classification every caller
//! relies on:
//!
//! - transport failures and 5xx responses are retryable
//! - 4xx responses are terminal
//! - an HTTP 200 body can still carry GraphQL `errors` or mutation
//!   `userErrors`, and both count as failure
//! - the "line does not exist" class of mutation error is mapped to a
//!   dedicated [`CommerceError::Desync`] variant here, in one place, so the
//!   cart store can branch on it without matching message text itself

mod client;
mod queries;
mod retry;
mod types;

pub use client::{CommerceApi, CommerceClient, ACCESS_TOKEN_HEADER};
pub use retry::RetryPolicy;
pub use types::*;

use thiserror::Error;

/// Message fragments the commerce platform uses when a mutation targets a
/// cart line that no longer exists on the remote cart.
const DESYNC_PATTERNS: &[&str] = &["does not exist", "merchandise line"];

/// Errors that can occur when talking to the commerce platform.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Request failed before a response arrived (timeout, connection reset).
    #[error("commerce request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("commerce endpoint returned status {0}")]
    Status(u16),

    /// The response body carried a GraphQL `errors` array.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    /// A mutation was rejected with user-facing errors (e.g. out of stock).
    #[error("{message}")]
    UserError {
        field: Option<String>,
        message: String,
    },

    /// A mutation targeted a cart line the remote cart no longer has.
    #[error("cart line no longer exists: {0}")]
    Desync(String),

    /// The cart id resolved to nothing on the platform.
    #[error("cart not found")]
    CartNotFound,

    /// No access token is configured.
    #[error("missing commerce access token")]
    MissingToken,

    /// The response body did not match the expected shape.
    #[error("invalid commerce response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CommerceError {
    /// Whether the retry helper should attempt this request again.
    ///
    /// Only failures that happened before a verdict was reached qualify:
    /// transport errors and server-side 5xx. Everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            CommerceError::Http(_) => true,
            CommerceError::Status(status) => *status >= 500,
            _ => false,
        }
    }

    /// Whether this failure looks like a temporary outage rather than a
    /// definitive answer about the cart.
    pub fn is_transient(&self) -> bool {
        self.is_retryable()
    }

    /// Whether this is the stale-line-reference error class.
    pub fn is_desync(&self) -> bool {
        matches!(self, CommerceError::Desync(_))
    }
}

/// Classify a mutation `userError` message, mapping the known stale-line
/// message patterns to [`CommerceError::Desync`].
pub(crate) fn classify_user_error(field: Option<String>, message: String) -> CommerceError {
    let lowered = message.to_lowercase();
    if DESYNC_PATTERNS.iter().any(|p| lowered.contains(p)) {
        CommerceError::Desync(message)
    } else {
        CommerceError::UserError { field, message }
    }
}
