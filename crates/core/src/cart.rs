//! Shopping cart.
//!
//! A cart is an ordered list of lines, one per product, in the order the
//! products were first added. Every stored line has a quantity of at least
//! one; setting a quantity to zero or below removes the line instead.

use serde::Serialize;

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product in the cart together with how many units were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product: Product,
    quantity: u32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// Number of units, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Bumps the existing line if the product is already in the cart,
    /// otherwise appends a new line with quantity one.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::new(product.clone()));
        }
    }

    /// Replace the quantity of a line.
    ///
    /// A quantity of zero or below removes the line. Unknown product IDs are
    /// ignored. Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, new_quantity: i64) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.product.id == product_id) else {
            return false;
        };

        if new_quantity <= 0 {
            self.lines.remove(index);
            return true;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        match self.lines.get_mut(index) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Exact sum of all line subtotals.
    #[must_use]
    pub fn grand_total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Lines in the order their products were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product.id == product_id)
    }

    /// Number of distinct products. This is the figure shown on the cart badge.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
