// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::AppError;

use crate::models::{
    AppointmentResponse, AvailableSlotsResponse, BookAppointmentRequest,
    CompleteAppointmentRequest, MedicalRecordResponse, SchedulingError, SlotQuery,
    UpdateRecordRequest,
};
use crate::services::availability::SlotService;
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleService;

/// Map the scheduling taxonomy onto transport-level responses. NotFound
/// family is 404, failed preconditions are 400, conflicts are 409, storage
/// failures are 500.
fn to_app_error(e: SchedulingError) -> AppError {
    match e {
        SchedulingError::ProviderNotFound
        | SchedulingError::PatientNotFound
        | SchedulingError::AppointmentNotFound
        | SchedulingError::RecordNotFound => AppError::NotFound(e.to_string()),

        SchedulingError::ProviderInactive
        | SchedulingError::NoScheduleForDay(_)
        | SchedulingError::OutsideWorkingHours
        | SchedulingError::MisalignedSlot
        | SchedulingError::PastDate
        | SchedulingError::AppointmentNotYetStarted
        | SchedulingError::AppointmentNotYetFinished => AppError::BadRequest(e.to_string()),

        SchedulingError::SlotUnavailable
        | SchedulingError::InvalidStateTransition(_)
        | SchedulingError::RecordAlreadyExists => AppError::Conflict(e.to_string()),

        SchedulingError::Storage(msg) => AppError::Storage(msg),
    }
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(store): State<Arc<ClinicStore>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let service = SlotService::new(store);
    let slots = service
        .compute_slots(query.provider_id, query.date)
        .await
        .map_err(to_app_error)?;

    Ok(Json(AvailableSlotsResponse {
        provider_id: query.provider_id,
        date: query.date,
        slots,
    }))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(store);
    let appointment = service.book(request).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": AppointmentResponse::from(appointment)
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let service = BookingService::new(store);
    let appointment = service
        .get_appointment(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(AppointmentResponse::from(appointment)))
}

#[axum::debug_handler]
pub async fn complete_appointment(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(store);
    let (appointment, record) = service
        .complete(appointment_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": AppointmentResponse::from(appointment),
        "record": MedicalRecordResponse::from(record)
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(store);
    let appointment = service.cancel(appointment_id).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": AppointmentResponse::from(appointment)
    })))
}

#[axum::debug_handler]
pub async fn mark_no_show(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(store);
    let appointment = service
        .mark_no_show(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": AppointmentResponse::from(appointment)
    })))
}

#[axum::debug_handler]
pub async fn get_medical_record(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<MedicalRecordResponse>, AppError> {
    let service = LifecycleService::new(store);
    let record = service
        .get_record(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(MedicalRecordResponse::from(record)))
}

#[axum::debug_handler]
pub async fn update_medical_record(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateRecordRequest>,
) -> Result<Json<MedicalRecordResponse>, AppError> {
    let service = LifecycleService::new(store);
    let record = service
        .update_record(appointment_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(MedicalRecordResponse::from(record)))
}

#[axum::debug_handler]
pub async fn delete_medical_record(
    State(store): State<Arc<ClinicStore>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(store);
    let appointment = service
        .delete_record(appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": AppointmentResponse::from(appointment)
    })))
}
