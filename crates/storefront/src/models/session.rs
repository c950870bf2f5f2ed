//! Session-related types.
//!
//! The cookie session only carries a pointer to the shopper's checkout; the
//! cart and form themselves live in the in-memory checkout registry so the
//! delayed order outcome can reach them outside of any request.

/// Session keys for checkout data.
pub mod keys {
    /// Key for storing the checkout session ID (a UUID).
    pub const CHECKOUT_ID: &str = "checkout_id";
}
