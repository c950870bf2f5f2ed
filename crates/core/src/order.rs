//! Order submission state machine.
//!
//! ```text
//!            submit()                 outcome
//! Idle ───────────────▶ Pending ───────────────▶ Succeeded
//!  ▲                     │   │                      │
//!  └────── cancel() ─────┘   └──────────────▶ Failed │
//!                                              │     │
//!                     submit() ◀───────────────┴─────┘
//! ```
//!
//! The workflow itself never waits and never draws random numbers. Entering
//! `Pending` hands out a [`SubmissionTicket`]; whoever owns the clock comes
//! back later with that ticket and an [`OrderOutcome`]. A ticket that no
//! longer matches the current submission is discarded, which is how a
//! cancelled submission's late answer gets dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cart::{Cart, CartLine};
use crate::checkout::{ShippingField, ShippingInfo};
use crate::types::{OrderId, OrderOutcome, Price, SubmissionStatus};

/// Decides whether a placement attempt succeeds.
///
/// Production wiring draws at random; tests plug in fixed or scripted answers.
pub trait OutcomePolicy: Send + Sync {
    fn decide(&self) -> OrderOutcome;
}

impl<F> OutcomePolicy for F
where
    F: Fn() -> OrderOutcome + Send + Sync,
{
    fn decide(&self) -> OrderOutcome {
        self()
    }
}

/// A policy that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOutcome(pub OrderOutcome);

impl FixedOutcome {
    pub const SUCCEED: Self = Self(OrderOutcome::Succeeded);
    pub const FAIL: Self = Self(OrderOutcome::Failed);
}

impl OutcomePolicy for FixedOutcome {
    fn decide(&self) -> OrderOutcome {
        self.0
    }
}

/// Why a submission was refused. None of these change any state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A submission is already waiting for its outcome.
    #[error("an order is already being placed")]
    AlreadyPending,
    /// Required shipping fields are empty.
    #[error("missing required shipping fields: {}", join_fields(.missing))]
    InvalidForm {
        /// Empty fields, in form order.
        missing: Vec<ShippingField>,
    },
    /// There is nothing to order.
    #[error("the cart is empty")]
    EmptyCart,
}

fn join_fields(fields: &[ShippingField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Handle for one pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket {
    generation: u64,
}

impl SubmissionTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Summary of a successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub id: OrderId,
    pub lines: Vec<CartLine>,
    pub total: Price,
    pub ship_to: ShippingInfo,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Capture the cart and shipping details as they are being cleared.
    #[must_use]
    pub fn capture(cart: &Cart, shipping: &ShippingInfo) -> Self {
        Self {
            id: OrderId::generate(),
            lines: cart.lines().to_vec(),
            total: cart.grand_total(),
            ship_to: shipping.clone(),
            placed_at: Utc::now(),
        }
    }
}

/// What happened when an outcome was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The order went through; cart and form were cleared.
    Placed(Box<OrderConfirmation>),
    /// The attempt failed; cart and form were left alone.
    Failed,
    /// The ticket was stale (cancelled or superseded) and nothing changed.
    Discarded,
}

/// The submission lifecycle of one session.
#[derive(Debug, Clone, Default)]
pub struct SubmissionWorkflow {
    status: SubmissionStatus,
    generation: u64,
}

impl SubmissionWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Enter `Pending`.
    ///
    /// Allowed from `Idle`, `Succeeded` and `Failed`; the previous result is
    /// simply replaced. A second call while `Pending` is refused before the
    /// form is even looked at.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::AlreadyPending`] while a submission is in
    /// flight, [`SubmitError::InvalidForm`] if a shipping field is empty, or
    /// [`SubmitError::EmptyCart`] if there is nothing to order.
    pub fn begin(
        &mut self,
        cart: &Cart,
        shipping: &ShippingInfo,
    ) -> Result<SubmissionTicket, SubmitError> {
        if !self.status.accepts_submit() {
            return Err(SubmitError::AlreadyPending);
        }
        if !shipping.is_valid() {
            return Err(SubmitError::InvalidForm {
                missing: shipping.missing_fields(),
            });
        }
        if cart.is_empty() {
            return Err(SubmitError::EmptyCart);
        }

        self.generation = self.generation.wrapping_add(1);
        self.status = SubmissionStatus::Pending;
        Ok(SubmissionTicket {
            generation: self.generation,
        })
    }

    /// Whether `ticket` belongs to the submission currently in flight.
    #[must_use]
    pub const fn is_current(&self, ticket: SubmissionTicket) -> bool {
        self.status.is_pending() && ticket.generation == self.generation
    }

    /// Leave `Pending` with the given outcome.
    ///
    /// Returns `false`, changing nothing, if the ticket is stale.
    pub fn settle(&mut self, ticket: SubmissionTicket, outcome: OrderOutcome) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.status = outcome.into();
        true
    }

    /// Abandon the pending submission and go back to `Idle`.
    ///
    /// The outstanding ticket becomes stale. Returns `false` if nothing was
    /// pending.
    pub fn cancel(&mut self) -> bool {
        if !self.status.is_pending() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.status = SubmissionStatus::Idle;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::catalog::Catalog;

    fn ready() -> (Cart, ShippingInfo) {
        let mut cart = Cart::new();
        cart.add_item(&Catalog::builtin().products()[0]);
        let mut shipping = ShippingInfo::default();
        for field in ShippingField::ALL {
            shipping.set_field(field, "x");
        }
        (cart, shipping)
    }

    #[test]
    fn test_begin_enters_pending() {
        let (cart, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        assert_eq!(workflow.status(), SubmissionStatus::Idle);

        let ticket = workflow.begin(&cart, &shipping).unwrap();
        assert_eq!(workflow.status(), SubmissionStatus::Pending);
        assert!(workflow.is_current(ticket));
    }

    #[test]
    fn test_begin_while_pending_is_refused() {
        let (cart, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        let first = workflow.begin(&cart, &shipping).unwrap();

        assert_eq!(
            workflow.begin(&cart, &shipping),
            Err(SubmitError::AlreadyPending)
        );
        // The original ticket is still the live one
        assert!(workflow.is_current(first));
        assert_eq!(workflow.status(), SubmissionStatus::Pending);
    }

    #[test]
    fn test_pending_check_comes_before_form_check() {
        let (cart, mut shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        workflow.begin(&cart, &shipping).unwrap();
        shipping.reset();
        assert_eq!(
            workflow.begin(&cart, &shipping),
            Err(SubmitError::AlreadyPending)
        );
    }

    #[test]
    fn test_invalid_form_is_refused() {
        let (cart, mut shipping) = ready();
        shipping.set_field(ShippingField::Zip, "");
        let mut workflow = SubmissionWorkflow::new();

        let err = workflow.begin(&cart, &shipping).unwrap_err();
        assert_eq!(
            err,
            SubmitError::InvalidForm {
                missing: vec![ShippingField::Zip]
            }
        );
        assert_eq!(err.to_string(), "missing required shipping fields: zip");
        assert_eq!(workflow.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let (_, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        assert_eq!(
            workflow.begin(&Cart::new(), &shipping),
            Err(SubmitError::EmptyCart)
        );
        assert_eq!(workflow.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_settle_applies_outcome_once() {
        let (cart, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        let ticket = workflow.begin(&cart, &shipping).unwrap();

        assert!(workflow.settle(ticket, OrderOutcome::Failed));
        assert_eq!(workflow.status(), SubmissionStatus::Failed);
        assert!(!workflow.settle(ticket, OrderOutcome::Succeeded));
        assert_eq!(workflow.status(), SubmissionStatus::Failed);
    }

    #[test]
    fn test_resubmit_from_terminal_states() {
        let (cart, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();

        for outcome in [OrderOutcome::Failed, OrderOutcome::Succeeded] {
            let ticket = workflow.begin(&cart, &shipping).unwrap();
            workflow.settle(ticket, outcome);
            assert_eq!(workflow.status(), SubmissionStatus::from(outcome));
        }
        let ticket = workflow.begin(&cart, &shipping).unwrap();
        assert_eq!(ticket.generation(), 3);
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let (cart, shipping) = ready();
        let mut workflow = SubmissionWorkflow::new();
        let ticket = workflow.begin(&cart, &shipping).unwrap();

        assert!(workflow.cancel());
        assert_eq!(workflow.status(), SubmissionStatus::Idle);
        assert!(!workflow.settle(ticket, OrderOutcome::Succeeded));
        assert_eq!(workflow.status(), SubmissionStatus::Idle);

        // A fresh submission is not confused with the cancelled one
        let next = workflow.begin(&cart, &shipping).unwrap();
        assert_ne!(next, ticket);
        assert!(!workflow.settle(ticket, OrderOutcome::Failed));
        assert!(workflow.is_current(next));
    }

    #[test]
    fn test_cancel_when_not_pending_is_noop() {
        let mut workflow = SubmissionWorkflow::new();
        assert!(!workflow.cancel());
        assert_eq!(workflow.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_fixed_outcome() {
        assert_eq!(FixedOutcome::SUCCEED.decide(), OrderOutcome::Succeeded);
        assert_eq!(FixedOutcome::FAIL.decide(), OrderOutcome::Failed);
    }

    #[test]
    fn test_closure_policy() {
        let calls = AtomicUsize::new(0);
        let alternating = || {
            if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                OrderOutcome::Failed
            } else {
                OrderOutcome::Succeeded
            }
        };
        assert_eq!(alternating.decide(), OrderOutcome::Failed);
        assert_eq!(alternating.decide(), OrderOutcome::Succeeded);
    }

    #[test]
    fn test_confirmation_captures_cart() {
        let (mut cart, shipping) = ready();
        cart.add_item(&Catalog::builtin().products()[0]);
        let confirmation = OrderConfirmation::capture(&cart, &shipping);

        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(confirmation.total, Price::from_cents(4998));
        assert_eq!(confirmation.ship_to, shipping);
    }
}
