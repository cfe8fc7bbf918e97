//! Wire types for the commerce platform's cart schema.
//!
//! Every value here is a point-in-time copy issued by the platform; nothing
//! is owned or recomputed locally.

use serde::{Deserialize, Serialize};

/// A decimal amount plus its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as a string, e.g. `"19.99"`.
    pub amount: String,
    /// ISO currency code, e.g. `"EUR"`.
    pub currency_code: String,
}

/// An image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Denormalized product snapshot carried on a merchandise reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageRef>,
}

/// A purchasable variant referenced by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    /// Opaque variant identifier.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    /// Product the variant belongs to.
    pub product: ProductSnapshot,
}

/// One line item within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Opaque line identifier, unique within the cart.
    pub id: String,
    /// Positive quantity; lines that violate this are dropped by
    /// [`Cart::sanitize`].
    pub quantity: i64,
    /// Merchandise reference; absent on ghost lines the platform can return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchandise: Option<Merchandise>,
}

/// Cost summary of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub total_amount: Money,
    pub subtotal_amount: Money,
}

/// Remote cart snapshot as last fetched or mutated.
///
/// A `Cart` is only ever replaced wholesale: every successful mutation
/// returns a complete new snapshot that fully replaces local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Opaque cart identifier, stable for the cart's lifetime.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Ordered line items.
    #[serde(default)]
    pub lines: Vec<CartLine>,
    pub cost: CartCost,
    /// Checkout handoff URL; must pass validation before any navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,
}

impl Cart {
    /// Drop lines that cannot be trusted: non-positive quantities and lines
    /// with no merchandise reference. The platform is not assumed to never
    /// return stale or ghost lines.
    pub fn sanitize(mut self) -> Self {
        self.lines
            .retain(|line| line.quantity >= 1 && line.merchandise.is_some());
        self
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// Input for creating or adding a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

/// Input for updating an existing cart line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    pub quantity: i64,
}

/// User-facing error attached to a mutation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Product handle listing entry, consumed by the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Collection handle listing entry, consumed by the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRef {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
