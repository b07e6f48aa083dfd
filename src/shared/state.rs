use std::sync::Arc;

use crate::store::CrmStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CrmStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }
}
