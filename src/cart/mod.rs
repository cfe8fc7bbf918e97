//! Cart synchronization store.
//!
//! The single authority for cart state in this process: UI-facing handlers
//! never talk to the commerce platform directly. At most one cart snapshot
//! is current at any time, and successful mutations replace it wholesale
//! with the platform's response.

mod checkout;
mod store;

pub use checkout::validate_checkout_url;
pub use store::{CartSnapshot, CartStore, Notice};
