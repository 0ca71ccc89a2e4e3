use natal_chart::ChartService;
use std::sync::Arc;

/// Shared by every handler. Lookups run concurrently; ephemeris calls are
/// serialized by the adapter's lock.
#[derive(Clone)]
pub struct AppState {
    pub charts: Arc<ChartService>,
}

impl AppState {
    pub fn new(charts: Arc<ChartService>) -> Self {
        Self { charts }
    }
}
