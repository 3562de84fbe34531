use std::sync::Arc;

use fleet_custody::{CarProjector, TransitionService};
use fleet_store::FleetStore;

use crate::config::ServerConfig;
use crate::postcode::PostcodeValidator;

/// Shared state handed to every handler.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub transitions: TransitionService<S>,
    pub projector: CarProjector<S>,
    pub postcodes: Arc<dyn PostcodeValidator>,
    pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            transitions: self.transitions.clone(),
            projector: self.projector.clone(),
            postcodes: Arc::clone(&self.postcodes),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: FleetStore> AppState<S> {
    pub fn new(
        store: Arc<S>,
        postcodes: Arc<dyn PostcodeValidator>,
        config: ServerConfig,
    ) -> Self {
        Self {
            transitions: TransitionService::new(Arc::clone(&store)),
            projector: CarProjector::new(Arc::clone(&store)),
            store,
            postcodes,
            config: Arc::new(config),
        }
    }
}
