//! Checkout session extractor.
//!
//! Resolves the shopper's [`SharedCheckout`] from the cookie session,
//! creating both the session pointer and an empty checkout on first visit.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session_keys;
use crate::services::SharedCheckout;
use crate::state::AppState;

/// Extractor for the current shopper's checkout session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentCheckout(checkout): CurrentCheckout) -> impl IntoResponse {
///     let count = checkout.lock().await.cart().line_count();
///     format!("{count} items")
/// }
/// ```
pub struct CurrentCheckout(pub SharedCheckout);

impl FromRequestParts<AppState> for CurrentCheckout {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let checkout_id = if let Some(id) = session.get::<Uuid>(session_keys::CHECKOUT_ID).await? {
            id
        } else {
            let id = Uuid::new_v4();
            session.insert(session_keys::CHECKOUT_ID, id).await?;
            id
        };

        tracing::Span::current().record("checkout_id", tracing::field::display(checkout_id));

        Ok(Self(state.checkouts().get_or_create(checkout_id).await))
    }
}
