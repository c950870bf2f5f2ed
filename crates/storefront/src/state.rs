//! Application state shared across handlers.

use std::sync::Arc;

use tringl_core::{Catalog, OutcomePolicy};

use crate::config::{ConfigError, StorefrontConfig};
use crate::services::{CheckoutRegistry, OrderService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the per-shopper checkout sessions and the order service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkouts: CheckoutRegistry,
    orders: OrderService,
}

impl AppState {
    /// Create the production application state.
    ///
    /// Loads the catalog and wires random order outcomes at the configured
    /// success rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, ConfigError> {
        let catalog = config.load_catalog()?;
        let orders = OrderService::from_config(&config.orders);
        Ok(Self::from_parts(config, catalog, orders))
    }

    /// Create application state with an explicit outcome policy.
    ///
    /// The processing delay still comes from `config`.
    #[must_use]
    pub fn with_policy(
        config: StorefrontConfig,
        catalog: Catalog,
        policy: Arc<dyn OutcomePolicy>,
    ) -> Self {
        let orders = OrderService::new(policy, config.orders.processing_delay);
        Self::from_parts(config, catalog, orders)
    }

    fn from_parts(config: StorefrontConfig, catalog: Catalog, orders: OrderService) -> Self {
        let checkouts = CheckoutRegistry::new(config.session_idle);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkouts,
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout session registry.
    #[must_use]
    pub fn checkouts(&self) -> &CheckoutRegistry {
        &self.inner.checkouts
    }

    /// Get a reference to the order placement service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
