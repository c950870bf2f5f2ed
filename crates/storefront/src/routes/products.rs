//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;
use tringl_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    /// Formatted price, e.g. `"$24.99"`.
    pub price: String,
    /// Formatted crossed-out price for discounted products.
    pub original_price: Option<String>,
    pub image_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price.display(),
            original_price: product.original_price.map(|p| p.display()),
            image_url: product.image_url.clone(),
        }
    }
}

/// List all products in catalog order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<Vec<ProductView>> {
    Json(
        state
            .catalog()
            .products()
            .iter()
            .map(ProductView::from)
            .collect(),
    )
}

/// Show a single product.
///
/// # Errors
///
/// Returns `NotFound` if no product has this ID.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<ProductView>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(|product| Json(ProductView::from(product)))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tringl_core::Catalog;

    use super::*;

    #[test]
    fn test_product_view_formats_prices() {
        let catalog = Catalog::builtin();
        let view = ProductView::from(catalog.get(ProductId::new(4)).unwrap());
        assert_eq!(view.price, "$10.99");
        assert_eq!(view.original_price.as_deref(), Some("$15.99"));

        let view = ProductView::from(catalog.get(ProductId::new(1)).unwrap());
        assert_eq!(view.price, "$24.99");
        assert!(view.original_price.is_none());
    }
}
