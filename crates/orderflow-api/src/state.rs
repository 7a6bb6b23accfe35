//! Shared application state.

use std::sync::Arc;

use orderflow_core::repository::ItemRepository;
use orderflow_orders::lines::LineService;
use orderflow_orders::service::OrderService;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Catalog item persistence.
    pub items: Arc<dyn ItemRepository>,
    /// Order assembly service.
    pub orders: Arc<OrderService>,
    /// Standalone order-line operations.
    pub lines: Arc<LineService>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        items: Arc<dyn ItemRepository>,
        orders: Arc<OrderService>,
        lines: Arc<LineService>,
    ) -> Self {
        Self {
            items,
            orders,
            lines,
        }
    }
}
