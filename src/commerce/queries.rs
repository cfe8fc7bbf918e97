//! GraphQL documents for the commerce API.
//!
//! All cart operations share one fragment so every mutation and query
//! returns the same complete snapshot shape.

/// Fields fetched for every cart snapshot.
const CART_FRAGMENT: &str = r#"
fragment CartFields on Cart {
  id
  createdAt
  updatedAt
  checkoutUrl
  cost {
    totalAmount { amount currencyCode }
    subtotalAmount { amount currencyCode }
  }
  lines {
    id
    quantity
    merchandise {
      id
      title
      price { amount currencyCode }
      compareAtPrice { amount currencyCode }
      product {
        title
        handle
        vendor
        featuredImage { url altText }
      }
    }
  }
}"#;

fn with_cart_fragment(operation: &str) -> String {
    format!("{operation}\n{CART_FRAGMENT}")
}

pub fn cart_create() -> String {
    with_cart_fragment(
        r#"mutation CartCreate($lines: [CartLineInput!]!) {
  cartCreate(input: { lines: $lines }) {
    cart { ...CartFields }
    userErrors { field message }
  }
}"#,
    )
}

pub fn cart_lines_add() -> String {
    with_cart_fragment(
        r#"mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}"#,
    )
}

pub fn cart_lines_update() -> String {
    with_cart_fragment(
        r#"mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}"#,
    )
}

pub fn cart_lines_remove() -> String {
    with_cart_fragment(
        r#"mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { field message }
  }
}"#,
    )
}

pub fn cart_query() -> String {
    with_cart_fragment(
        r#"query CartQuery($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}"#,
    )
}

pub fn products_query() -> String {
    r#"query ProductHandles {
  products { handle updatedAt }
}"#
    .to_string()
}

pub fn collections_query() -> String {
    r#"query CollectionHandles {
  collections { handle updatedAt }
}"#
    .to_string()
}
