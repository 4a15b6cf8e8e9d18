//! Shared application state for the HTTP server.

use crate::service::PlanService;

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: PlanService,
}

impl AppState {
    pub fn new(service: PlanService) -> Self {
        Self { service }
    }
}
