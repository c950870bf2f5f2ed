//! Cart route handlers.
//!
//! Cart state lives in the shopper's checkout session. Every mutating
//! handler returns the full cart view so the front end can re-render the
//! cart panel and its badge from one response.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tringl_core::{Cart, CartLine, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentCheckout;
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    /// Distinct products in the cart (the badge figure).
    pub item_count: usize,
    /// Units across all lines.
    pub unit_count: u64,
}

/// Cart badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCountView {
    pub count: usize,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            quantity: line.quantity(),
            price: line.product.price.display(),
            line_price: line.subtotal().display(),
            image_url: line.product.image_url.clone(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.grand_total().display(),
            item_count: cart.line_count(),
            unit_count: cart.unit_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    /// New quantity; zero or below removes the line.
    pub quantity: i64,
}

/// Display the cart.
#[instrument(skip_all)]
pub async fn show(CurrentCheckout(checkout): CurrentCheckout) -> Json<CartView> {
    Json(CartView::from(checkout.lock().await.cart()))
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `NotFound` if the product is not in the catalog.
#[instrument(skip(state, checkout))]
pub async fn add(
    State(state): State<AppState>,
    CurrentCheckout(checkout): CurrentCheckout,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .get(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut session = checkout.lock().await;
    session.add_item(product);
    tracing::debug!(product_id = %product.id, lines = session.cart().line_count(), "Added to cart");
    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));

    Ok(Json(CartView::from(session.cart())))
}

/// Change the quantity of a line.
///
/// Unknown products are ignored and the unchanged cart is returned.
#[instrument(skip(checkout))]
pub async fn update(
    CurrentCheckout(checkout): CurrentCheckout,
    Form(form): Form<UpdateCartForm>,
) -> Json<CartView> {
    let mut session = checkout.lock().await;
    let changed = session.set_quantity(ProductId::new(form.product_id), form.quantity);
    if !changed {
        tracing::debug!(product_id = form.product_id, "Cart update had no effect");
    }
    Json(CartView::from(session.cart()))
}

/// Get the cart badge count.
#[instrument(skip_all)]
pub async fn count(CurrentCheckout(checkout): CurrentCheckout) -> Json<CartCountView> {
    Json(CartCountView {
        count: checkout.lock().await.cart().line_count(),
    })
}
