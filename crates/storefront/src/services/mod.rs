//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkouts` - In-memory registry of per-shopper checkout sessions
//! - `orders` - Simulated order placement (delay + outcome policy)
//! - `sessions` - Bounded cookie session store

pub mod checkouts;
pub mod orders;
pub mod sessions;

pub use checkouts::{CheckoutRegistry, SharedCheckout};
pub use orders::{OrderService, PendingOrder, RandomOutcome};
pub use sessions::SessionCache;
