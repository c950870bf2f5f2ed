//! Tringl Core - cart and checkout domain library.
//!
//! This crate holds everything that has real invariants in the storefront:
//! - [`catalog`] - The immutable product catalog
//! - [`cart`] - Cart lines, quantity rules and totals
//! - [`checkout`] - Shipping form fields and required-field validation
//! - [`order`] - The order submission state machine and outcome policies
//! - [`session`] - One shopper's cart, form and submission bundled together
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no
//! timers, no randomness. The storefront binary owns the clock and the random
//! draw, and feeds outcomes back through [`CheckoutSession::resolve`].
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and submission status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod session;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{FieldError, ShippingField, ShippingInfo};
pub use order::{
    FixedOutcome, OrderConfirmation, OutcomePolicy, Resolution, SubmissionTicket, SubmissionWorkflow,
    SubmitError,
};
pub use session::CheckoutSession;
pub use types::*;
