//! Application state for the web layer.

use std::sync::Arc;

use crate::store::InMemoryLineStore;
use crate::topology::LineTopologyService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Line topology operations over the configured store
    pub topology: Arc<LineTopologyService<InMemoryLineStore>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: InMemoryLineStore) -> Self {
        Self {
            topology: Arc::new(LineTopologyService::new(store)),
        }
    }
}
