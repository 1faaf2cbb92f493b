use std::sync::Arc;

use axum::{routing::get, Router};

use directory_cell::router::{patient_routes, provider_routes};
use scheduling_cell::router::appointment_routes;
use shared_database::ClinicStore;

pub fn create_router(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest("/appointments", appointment_routes(store.clone()))
        .nest("/providers", provider_routes(store.clone()))
        .nest("/patients", patient_routes(store.clone()))
}
