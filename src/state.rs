use std::sync::Arc;

use crate::store::Store;

/// Shared application state; the store is injected so handlers stay agnostic
/// of the backing engine.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
