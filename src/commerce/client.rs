//! HTTP client for the commerce GraphQL endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{
    classify_user_error, queries, Cart, CartLineInput, CartLineUpdateInput, CollectionRef,
    CommerceError, ProductRef, RetryPolicy, UserError,
};
use crate::config::Config;

/// Header carrying the static access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-storefront-access-token";

/// Cart operations of the commerce platform.
///
/// The cart store only ever talks to the platform through this trait, so
/// tests can substitute an in-process implementation.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Create a new cart seeded with the given lines.
    async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, CommerceError>;

    /// Add lines to an existing cart.
    async fn add_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError>;

    /// Update quantities of existing lines.
    async fn update_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError>;

    /// Remove lines from the cart.
    async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError>;

    /// Fetch a cart by id; `None` when the platform no longer knows it.
    async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>, CommerceError>;
}

/// Transport-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Payload shape shared by all cart mutations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartMutationPayload {
    #[serde(default)]
    cart: Option<Cart>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

/// Concrete client over `reqwest` with bounded retry.
#[derive(Clone)]
pub struct CommerceClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl CommerceClient {
    pub fn new(config: &Config) -> Self {
        Self::with_policy(
            config.commerce_endpoint.clone(),
            config.commerce_token.clone(),
            RetryPolicy::default(),
        )
    }

    /// Build a client with an explicit retry policy (tests shorten delays).
    pub fn with_policy(endpoint: String, token: Option<String>, retry: RetryPolicy) -> Self {
        let http = reqwest::Client::builder()
            .timeout(retry.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint,
            token,
            retry,
        }
    }

    /// Execute a GraphQL document with the configured retry policy and
    /// return its `data` value.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, CommerceError> {
        let mut attempt = 1;
        loop {
            match self.execute_once(query, &variables).await {
                Ok(data) => return Ok(data),
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Commerce request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One request/response cycle, no retry.
    async fn execute_once(&self, query: &str, variables: &Value) -> Result<Value, CommerceError> {
        let token = self.token.as_deref().ok_or(CommerceError::MissingToken)?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(CommerceError::Status(status.as_u16()));
        }

        // A 200 body can still carry GraphQL-level errors.
        let body: GraphQlResponse = response.json().await?;
        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CommerceError::GraphQl(joined));
        }

        Ok(body.data.unwrap_or(Value::Null))
    }

    /// Extract the payload for `key` out of a mutation's `data` value and
    /// resolve it to a cart or a classified failure.
    fn mutation_cart(data: Value, key: &str) -> Result<Cart, CommerceError> {
        let raw = data.get(key).cloned().unwrap_or(Value::Null);
        let payload: CartMutationPayload = serde_json::from_value(raw)?;

        if let Some(user_error) = payload.user_errors.into_iter().next() {
            return Err(classify_user_error(user_error.field, user_error.message));
        }

        payload
            .cart
            .ok_or_else(|| CommerceError::GraphQl(format!("{key} returned no cart")))
    }

    /// Forward an arbitrary GraphQL request body, injecting the access
    /// token. Single attempt, upstream status and body pass through.
    pub async fn forward_raw(&self, body: Value) -> Result<(u16, Value), CommerceError> {
        let token = self.token.as_deref().ok_or(CommerceError::MissingToken)?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// List product handles for the sitemap.
    pub async fn list_products(&self) -> Result<Vec<ProductRef>, CommerceError> {
        let data = self.execute(&queries::products_query(), json!({})).await?;
        let raw = data.get("products").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(raw)?)
    }

    /// List collection handles for the sitemap.
    pub async fn list_collections(&self) -> Result<Vec<CollectionRef>, CommerceError> {
        let data = self
            .execute(&queries::collections_query(), json!({}))
            .await?;
        let raw = data.get("collections").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(raw)?)
    }
}

#[async_trait]
impl CommerceApi for CommerceClient {
    async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, CommerceError> {
        let data = self
            .execute(&queries::cart_create(), json!({ "lines": lines }))
            .await?;
        Self::mutation_cart(data, "cartCreate")
    }

    async fn add_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, CommerceError> {
        let data = self
            .execute(
                &queries::cart_lines_add(),
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        Self::mutation_cart(data, "cartLinesAdd")
    }

    async fn update_lines(
        &self,
        cart_id: &str,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, CommerceError> {
        let data = self
            .execute(
                &queries::cart_lines_update(),
                json!({ "cartId": cart_id, "lines": lines }),
            )
            .await?;
        Self::mutation_cart(data, "cartLinesUpdate")
    }

    async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: Vec<String>,
    ) -> Result<Cart, CommerceError> {
        let data = self
            .execute(
                &queries::cart_lines_remove(),
                json!({ "cartId": cart_id, "lineIds": line_ids }),
            )
            .await?;
        Self::mutation_cart(data, "cartLinesRemove")
    }

    async fn get_cart(&self, cart_id: &str) -> Result<Option<Cart>, CommerceError> {
        let data = self
            .execute(&queries::cart_query(), json!({ "cartId": cart_id }))
            .await?;

        match data.get("cart") {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_value(raw.clone())?)),
        }
    }
}
