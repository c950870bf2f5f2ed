//! Product catalog.
//!
//! The catalog is loaded once at startup and never mutated afterwards. Order
//! is preserved so the storefront lists products the way they were supplied.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Errors that can occur when building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Two products share an ID.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    /// A product has an empty name.
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    /// A product has a price below zero.
    #[error("product {id} has a negative price ({price})")]
    NegativePrice {
        /// Offending product.
        id: ProductId,
        /// Its price.
        price: Price,
    },
    /// A price above [`Price::MAX_UNIT`].
    #[error("product {id} price {price} exceeds the maximum unit price {max}", max = Price::MAX_UNIT)]
    PriceTooLarge {
        /// Offending product.
        id: ProductId,
        /// Its price.
        price: Price,
    },
    /// A "was" price that is not above the current price.
    #[error("product {id} original price {original} must be greater than price {price}")]
    OriginalPriceNotHigher {
        /// Offending product.
        id: ProductId,
        /// Current price.
        price: Price,
        /// Crossed-out price.
        original: Price,
    },
    /// The catalog document could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A product offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Crossed-out price shown when the product is discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    pub image_url: String,
}

impl Product {
    /// Whether the product is shown with a crossed-out original price.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.original_price.is_some()
    }

    /// How much cheaper the product is than its original price.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        self.original_price
            .map(|original| Price::new(original.amount() - self.price.amount()))
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.name.is_empty() {
            return Err(CatalogError::EmptyName(self.id));
        }
        if self.price.is_negative() {
            return Err(CatalogError::NegativePrice {
                id: self.id,
                price: self.price,
            });
        }
        if self.price > Price::MAX_UNIT {
            return Err(CatalogError::PriceTooLarge {
                id: self.id,
                price: self.price,
            });
        }
        if let Some(original) = self.original_price
            && original <= self.price
        {
            return Err(CatalogError::OriginalPriceNotHigher {
                id: self.id,
                price: self.price,
                original,
            });
        }
        Ok(())
    }
}

/// The immutable, ordered list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating every product.
    ///
    /// # Errors
    ///
    /// Returns an error if product IDs are not unique, a name is empty, a
    /// price is negative or above [`Price::MAX_UNIT`], or an original price
    /// is not above the price.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The launch catalog the shop ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let product = |id: i32, name: &str, cents: i64, original: Option<i64>, image: &str| {
            Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                price: Price::from_cents(cents),
                original_price: original.map(Price::from_cents),
                image_url: format!("https://placehold.co/300x200?text={image}"),
            }
        };

        Self {
            products: vec![
                product(1, "Rundes Kuschelbett für Katzen", 2499, None, "Kuschelbett"),
                product(
                    2,
                    "Handyhülle kompatibel für iPhone 16 Pro Max, 15, 14, 13, 12, 11",
                    799,
                    None,
                    "Handyhülle",
                ),
                product(3, "Süßer Mini-Tischstaubsauger", 1199, None, "Mini-Staubsauger"),
                product(
                    4,
                    "Herren-Armband aus Edelstahl mit Goldton Schlangenmuster",
                    1099,
                    Some(1599),
                    "Armband",
                ),
                product(5, "Unisex Uhrband – einfach und bequem", 999, None, "Uhrband"),
                product(
                    6,
                    "Widerstandsbänder Push-Up-Bars faltbar & tragbar",
                    2799,
                    None,
                    "Push-Up-Bar",
                ),
            ],
        }
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
