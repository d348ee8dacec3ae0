use axum::{
    routing::{delete, get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use zapdrop_channels::ChatTransport;
use zapdrop_core::config::ZapdropConfig;
use zapdrop_scheduler::SchedulerHandle;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub scheduler: SchedulerHandle,
    pub transport: Arc<dyn ChatTransport>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        config: &ZapdropConfig,
        scheduler: SchedulerHandle,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            scheduler,
            transport,
            uploads_dir: PathBuf::from(&config.storage.uploads_dir),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/schedule",
            post(crate::http::schedule::create_schedule)
                .get(crate::http::schedule::list_schedules),
        )
        .route(
            "/schedule/{id}",
            delete(crate::http::schedule::delete_schedule),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
