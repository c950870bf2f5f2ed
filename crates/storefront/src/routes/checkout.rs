//! Checkout route handlers.
//!
//! The shipping form is edited one field at a time. Submitting starts the
//! simulated order placement and returns immediately with the `pending`
//! status; the front end polls `GET /checkout` until the status settles on
//! `succeeded` or `failed`.

use std::sync::Arc;

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tringl_core::{
    CheckoutSession, OrderConfirmation, OrderId, ShippingField, ShippingInfo, SubmissionStatus,
};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentCheckout;
use crate::routes::cart::{CartItemView, CartView};
use crate::state::AppState;

/// Placed order display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub items: Vec<CartItemView>,
    pub total: String,
    pub ship_to: ShippingInfo,
    /// RFC 3339 timestamp.
    pub placed_at: String,
}

/// Checkout display data.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    pub status: SubmissionStatus,
    /// Banner text for the current status, if any.
    pub message: Option<&'static str>,
    /// Whether the order button should be enabled.
    pub can_submit: bool,
    pub shipping: ShippingInfo,
    pub missing_fields: Vec<ShippingField>,
    pub cart: CartView,
    pub last_order: Option<OrderView>,
}

impl From<&OrderConfirmation> for OrderView {
    fn from(order: &OrderConfirmation) -> Self {
        Self {
            id: order.id,
            items: order.lines.iter().map(CartItemView::from).collect(),
            total: order.total.display(),
            ship_to: order.ship_to.clone(),
            placed_at: order.placed_at.to_rfc3339(),
        }
    }
}

impl From<&CheckoutSession> for CheckoutView {
    fn from(session: &CheckoutSession) -> Self {
        let status = session.status();
        let shipping = session.shipping();
        Self {
            status,
            message: status_message(status),
            can_submit: status.accepts_submit()
                && shipping.is_valid()
                && !session.cart().is_empty(),
            shipping: shipping.clone(),
            missing_fields: shipping.missing_fields(),
            cart: CartView::from(session.cart()),
            last_order: session.last_order().map(OrderView::from),
        }
    }
}

/// Shopper-facing banner for each status.
const fn status_message(status: SubmissionStatus) -> Option<&'static str> {
    match status {
        SubmissionStatus::Idle => None,
        SubmissionStatus::Pending => Some("Bestellung wird bearbeitet..."),
        SubmissionStatus::Succeeded => {
            Some("Vielen Dank! Deine Bestellung wurde erfolgreich aufgegeben.")
        }
        SubmissionStatus::Failed => {
            Some("Leider gab es einen Fehler bei der Bestellung. Bitte versuche es erneut.")
        }
    }
}

/// Shipping field form data.
#[derive(Debug, Deserialize)]
pub struct FieldForm {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Display the checkout state.
#[instrument(skip_all)]
pub async fn show(CurrentCheckout(checkout): CurrentCheckout) -> Json<CheckoutView> {
    Json(CheckoutView::from(&*checkout.lock().await))
}

/// Overwrite one shipping field.
///
/// # Errors
///
/// Returns a bad request if the field name is unknown.
#[instrument(skip(checkout, form), fields(field = %form.field))]
pub async fn set_field(
    CurrentCheckout(checkout): CurrentCheckout,
    Form(form): Form<FieldForm>,
) -> Result<Json<CheckoutView>> {
    let field: ShippingField = form.field.parse()?;

    let mut session = checkout.lock().await;
    session.set_field(field, form.value);
    Ok(Json(CheckoutView::from(&*session)))
}

/// Submit the order.
///
/// Responds `202 Accepted` with the pending checkout state.
///
/// # Errors
///
/// Returns `409 Conflict` while an order is already pending, and
/// `422 Unprocessable Entity` if the form is incomplete or the cart is empty.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    CurrentCheckout(checkout): CurrentCheckout,
) -> Result<(StatusCode, Json<CheckoutView>)> {
    let pending = state
        .orders()
        .submit(Arc::clone(&checkout))
        .await
        .inspect_err(|e| tracing::info!(reason = %e, "Order submission rejected"))?;

    let generation = pending.ticket().generation().to_string();
    add_breadcrumb(
        "checkout",
        "Order submitted",
        Some(&[("generation", generation.as_str())]),
    );

    let view = CheckoutView::from(&*checkout.lock().await);
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Cancel a pending order. Cart and form are kept.
#[instrument(skip_all)]
pub async fn cancel(
    State(state): State<AppState>,
    CurrentCheckout(checkout): CurrentCheckout,
) -> Json<CheckoutView> {
    state.orders().cancel(&checkout).await;
    Json(CheckoutView::from(&*checkout.lock().await))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tringl_core::{Catalog, OrderOutcome, ProductId};

    use super::*;

    fn filled_session() -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.add_item(Catalog::builtin().get(ProductId::new(3)).unwrap());
        for field in ShippingField::ALL {
            session.set_field(field, "value");
        }
        session
    }

    #[test]
    fn test_view_of_fresh_session() {
        let view = CheckoutView::from(&CheckoutSession::new());
        assert_eq!(view.status, SubmissionStatus::Idle);
        assert!(view.message.is_none());
        assert!(!view.can_submit);
        assert_eq!(view.missing_fields.len(), 5);
        assert!(view.last_order.is_none());
    }

    #[test]
    fn test_view_ready_to_submit() {
        let view = CheckoutView::from(&filled_session());
        assert!(view.can_submit);
        assert!(view.missing_fields.is_empty());
    }

    #[test]
    fn test_view_while_pending() {
        let mut session = filled_session();
        session.submit().unwrap();
        let view = CheckoutView::from(&session);
        assert_eq!(view.status, SubmissionStatus::Pending);
        assert!(!view.can_submit);
        assert_eq!(view.message, Some("Bestellung wird bearbeitet..."));
    }

    #[test]
    fn test_view_after_success() {
        let mut session = filled_session();
        let ticket = session.submit().unwrap();
        session.resolve(ticket, OrderOutcome::Succeeded);

        let view = CheckoutView::from(&session);
        assert_eq!(view.status, SubmissionStatus::Succeeded);
        assert!(view.message.unwrap().starts_with("Vielen Dank"));
        assert!(view.cart.items.is_empty());
        let order = view.last_order.unwrap();
        assert_eq!(order.total, "$11.99");
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_view_after_failure() {
        let mut session = filled_session();
        let ticket = session.submit().unwrap();
        session.resolve(ticket, OrderOutcome::Failed);

        let view = CheckoutView::from(&session);
        assert_eq!(view.status, SubmissionStatus::Failed);
        assert!(view.message.unwrap().starts_with("Leider"));
        assert!(view.can_submit);
        assert_eq!(view.cart.item_count, 1);
    }
}
