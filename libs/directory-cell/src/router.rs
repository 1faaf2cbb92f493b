// libs/directory-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_database::ClinicStore;

use crate::handlers;

pub fn provider_routes(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/", post(handlers::create_provider))
        .route("/{provider_id}", get(handlers::get_provider))
        .route("/{provider_id}/activate", post(handlers::activate_provider))
        .route("/{provider_id}/deactivate", post(handlers::deactivate_provider))
        .route(
            "/{provider_id}/shifts",
            get(handlers::list_shifts).post(handlers::add_shift),
        )
        .route(
            "/{provider_id}/shifts/{weekday}",
            put(handlers::update_shift).delete(handlers::remove_shift),
        )
        .route(
            "/{provider_id}/appointments",
            get(handlers::get_provider_appointments),
        )
        .with_state(store)
}

pub fn patient_routes(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/", post(handlers::create_patient))
        .route("/{patient_id}", get(handlers::get_patient))
        .route("/{patient_id}/activate", post(handlers::activate_patient))
        .route("/{patient_id}/deactivate", post(handlers::deactivate_patient))
        .route(
            "/{patient_id}/appointments",
            get(handlers::get_patient_appointments),
        )
        .with_state(store)
}
