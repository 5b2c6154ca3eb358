//! Shared application state

use std::sync::Arc;

use crate::application::ports::outbound::EventStorePort;
use crate::application::services::MarkerService;
use crate::domain::services::GridClusterer;
use crate::infrastructure::config::AppConfig;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Canonical collection served over REST
    pub store: Arc<dyn EventStorePort>,
    pub marker_service: MarkerService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn EventStorePort>) -> Self {
        let marker_service = MarkerService::new(GridClusterer::new(
            config.cell_constant,
            config.cluster_bypass_zoom,
        ));

        Self {
            config,
            store,
            marker_service,
        }
    }
}
