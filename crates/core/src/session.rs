//! Per-shopper checkout session.
//!
//! Bundles the cart, the shipping form and the submission workflow so that a
//! successful outcome clears both in one step, under whatever lock the caller
//! holds on the session.

use crate::cart::Cart;
use crate::catalog::Product;
use crate::checkout::{ShippingField, ShippingInfo};
use crate::order::{OrderConfirmation, Resolution, SubmissionTicket, SubmissionWorkflow, SubmitError};
use crate::types::{OrderOutcome, ProductId, SubmissionStatus};

/// Everything one shopper has in progress.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSession {
    cart: Cart,
    shipping: ShippingInfo,
    workflow: SubmissionWorkflow,
    last_order: Option<OrderConfirmation>,
}

impl CheckoutSession {
    /// Start with an empty cart and an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    #[must_use]
    pub const fn status(&self) -> SubmissionStatus {
        self.workflow.status()
    }

    /// The most recent successfully placed order, if any.
    #[must_use]
    pub const fn last_order(&self) -> Option<&OrderConfirmation> {
        self.last_order.as_ref()
    }

    pub fn add_item(&mut self, product: &Product) {
        self.cart.add_item(product);
    }

    /// See [`Cart::set_quantity`].
    pub fn set_quantity(&mut self, product_id: ProductId, new_quantity: i64) -> bool {
        self.cart.set_quantity(product_id, new_quantity)
    }

    pub fn set_field(&mut self, field: ShippingField, value: impl Into<String>) {
        self.shipping.set_field(field, value);
    }

    /// Start placing the order.
    ///
    /// # Errors
    ///
    /// See [`SubmissionWorkflow::begin`].
    pub fn submit(&mut self) -> Result<SubmissionTicket, SubmitError> {
        self.workflow.begin(&self.cart, &self.shipping)
    }

    /// Deliver the outcome for a pending submission.
    ///
    /// On success the cart and form are cleared and a confirmation is
    /// recorded. On failure both are left exactly as they were. A stale
    /// ticket changes nothing.
    pub fn resolve(&mut self, ticket: SubmissionTicket, outcome: OrderOutcome) -> Resolution {
        if !self.workflow.settle(ticket, outcome) {
            return Resolution::Discarded;
        }

        match outcome {
            OrderOutcome::Succeeded => {
                let confirmation = OrderConfirmation::capture(&self.cart, &self.shipping);
                self.cart.clear();
                self.shipping.reset();
                self.last_order = Some(confirmation.clone());
                Resolution::Placed(Box::new(confirmation))
            }
            OrderOutcome::Failed => Resolution::Failed,
        }
    }

    /// Abandon a pending submission. Cart and form are untouched.
    pub fn cancel(&mut self) -> bool {
        self.workflow.cancel()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::Price;

    fn filled_session() -> CheckoutSession {
        let catalog = Catalog::builtin();
        let mut session = CheckoutSession::new();
        session.add_item(catalog.get(ProductId::new(1)).unwrap());
        session.add_item(catalog.get(ProductId::new(1)).unwrap());
        session.add_item(catalog.get(ProductId::new(2)).unwrap());
        session.set_field(ShippingField::Name, "Max Mustermann");
        session.set_field(ShippingField::Email, "max@example.com");
        session.set_field(ShippingField::Address, "Musterweg 1");
        session.set_field(ShippingField::City, "Berlin");
        session.set_field(ShippingField::Zip, "10115");
        session
    }

    #[test]
    fn test_success_clears_cart_and_form() {
        let mut session = filled_session();
        let ticket = session.submit().unwrap();
        assert_eq!(session.status(), SubmissionStatus::Pending);

        let resolution = session.resolve(ticket, OrderOutcome::Succeeded);

        assert_eq!(session.status(), SubmissionStatus::Succeeded);
        assert_eq!(session.cart().line_count(), 0);
        assert_eq!(session.shipping(), &ShippingInfo::default());
        let Resolution::Placed(confirmation) = resolution else {
            panic!("expected a placed order, got {resolution:?}");
        };
        assert_eq!(confirmation.total, Price::from_cents(5797));
        assert_eq!(confirmation.ship_to.city, "Berlin");
        assert_eq!(session.last_order(), Some(confirmation.as_ref()));
    }

    #[test]
    fn test_failure_preserves_cart_and_form() {
        let mut session = filled_session();
        let cart_before = session.cart().clone();
        let shipping_before = session.shipping().clone();

        let ticket = session.submit().unwrap();
        assert_eq!(
            session.resolve(ticket, OrderOutcome::Failed),
            Resolution::Failed
        );

        assert_eq!(session.status(), SubmissionStatus::Failed);
        assert_eq!(session.cart(), &cart_before);
        assert_eq!(session.shipping(), &shipping_before);
        assert!(session.last_order().is_none());
    }

    #[test]
    fn test_retry_after_failure() {
        let mut session = filled_session();
        let first = session.submit().unwrap();
        session.resolve(first, OrderOutcome::Failed);

        let second = session.submit().unwrap();
        assert_eq!(session.status(), SubmissionStatus::Pending);
        assert!(matches!(
            session.resolve(second, OrderOutcome::Succeeded),
            Resolution::Placed(_)
        ));
    }

    #[test]
    fn test_double_submit_changes_nothing() {
        let mut session = filled_session();
        let ticket = session.submit().unwrap();
        assert_eq!(session.submit(), Err(SubmitError::AlreadyPending));
        assert_eq!(session.status(), SubmissionStatus::Pending);

        // Only the first ticket resolves
        assert!(matches!(
            session.resolve(ticket, OrderOutcome::Succeeded),
            Resolution::Placed(_)
        ));
        assert_eq!(
            session.resolve(ticket, OrderOutcome::Succeeded),
            Resolution::Discarded
        );
    }

    #[test]
    fn test_cancelled_outcome_is_discarded() {
        let mut session = filled_session();
        let cart_before = session.cart().clone();
        let ticket = session.submit().unwrap();

        assert!(session.cancel());
        assert_eq!(
            session.resolve(ticket, OrderOutcome::Succeeded),
            Resolution::Discarded
        );
        assert_eq!(session.status(), SubmissionStatus::Idle);
        assert_eq!(session.cart(), &cart_before);
        assert!(session.shipping().is_valid());
    }

    #[test]
    fn test_invalid_form_blocks_submit() {
        let mut session = filled_session();
        session.set_field(ShippingField::Email, "");
        assert!(matches!(
            session.submit(),
            Err(SubmitError::InvalidForm { .. })
        ));
        assert_eq!(session.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn test_second_order_replaces_last_order() {
        let catalog = Catalog::builtin();
        let mut session = filled_session();
        let ticket = session.submit().unwrap();
        session.resolve(ticket, OrderOutcome::Succeeded);
        let first_id = session.last_order().unwrap().id;

        session.add_item(catalog.get(ProductId::new(3)).unwrap());
        for field in ShippingField::ALL {
            session.set_field(field, "y");
        }
        let ticket = session.submit().unwrap();
        session.resolve(ticket, OrderOutcome::Succeeded);

        let last = session.last_order().unwrap();
        assert_ne!(last.id, first_id);
        assert_eq!(last.total, Price::from_cents(1199));
    }
}
