// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use shared_database::ClinicStore;

use crate::handlers;

pub fn appointment_routes(store: Arc<ClinicStore>) -> Router {
    Router::new()
        .route("/slots", get(handlers::get_available_slots))
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/complete", post(handlers::complete_appointment))
        .route("/{appointment_id}/cancel", put(handlers::cancel_appointment))
        .route("/{appointment_id}/no-show", put(handlers::mark_no_show))
        .route(
            "/{appointment_id}/record",
            get(handlers::get_medical_record)
                .put(handlers::update_medical_record)
                .delete(handlers::delete_medical_record),
        )
        .with_state(store)
}
