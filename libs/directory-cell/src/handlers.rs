// libs/directory-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use scheduling_cell::models::AppointmentResponse;
use scheduling_cell::BookingService;
use shared_database::ClinicStore;
use shared_models::{parse_weekday, AppError};

use crate::models::{
    CreatePatientRequest, CreateProviderRequest, CreateShiftRequest, DirectoryError,
    PatientResponse, ProviderResponse, ShiftResponse, UpdateShiftRequest,
};
use crate::services::directory::{PatientService, ProviderService};
use crate::services::schedule::ScheduleService;

fn to_app_error(e: DirectoryError) -> AppError {
    match e {
        DirectoryError::ProviderNotFound
        | DirectoryError::PatientNotFound
        | DirectoryError::ScheduleNotFound(_) => AppError::NotFound(e.to_string()),

        DirectoryError::InvalidEnum(_) | DirectoryError::InvalidShiftWindow => {
            AppError::ValidationError(e.to_string())
        }

        DirectoryError::DuplicateShift(_)
        | DirectoryError::ProviderAlreadyActive
        | DirectoryError::ProviderAlreadyInactive
        | DirectoryError::PatientAlreadyActive
        | DirectoryError::PatientAlreadyInactive => AppError::Conflict(e.to_string()),

        DirectoryError::Storage(msg) => AppError::Storage(msg),
    }
}

// ==============================================================================
// PROVIDER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_provider(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<Json<ProviderResponse>, AppError> {
    let provider = ProviderService::new(store)
        .create(request)
        .await
        .map_err(to_app_error)?;
    Ok(Json(ProviderResponse::from(provider)))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ProviderResponse>, AppError> {
    let provider = ProviderService::new(store)
        .get(provider_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(ProviderResponse::from(provider)))
}

#[axum::debug_handler]
pub async fn activate_provider(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ProviderResponse>, AppError> {
    let provider = ProviderService::new(store)
        .activate(provider_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(ProviderResponse::from(provider)))
}

#[axum::debug_handler]
pub async fn deactivate_provider(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (provider, cancelled) = ProviderService::new(store)
        .deactivate(provider_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "provider": ProviderResponse::from(provider),
        "cancelled_appointments": cancelled
            .into_iter()
            .map(AppointmentResponse::from)
            .collect::<Vec<_>>()
    })))
}

#[axum::debug_handler]
pub async fn get_provider_appointments(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    ProviderService::new(Arc::clone(&store))
        .get(provider_id)
        .await
        .map_err(to_app_error)?;

    let appointments = BookingService::new(store)
        .appointments_for_provider(provider_id)
        .await;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

// ==============================================================================
// SHIFT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_shift(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<CreateShiftRequest>,
) -> Result<Json<ShiftResponse>, AppError> {
    let shift = ScheduleService::new(store)
        .add_shift(provider_id, request)
        .await
        .map_err(to_app_error)?;
    Ok(Json(ShiftResponse::from(shift)))
}

#[axum::debug_handler]
pub async fn list_shifts(
    State(store): State<Arc<ClinicStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Vec<ShiftResponse>>, AppError> {
    let shifts = ScheduleService::new(store)
        .list_shifts(provider_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(shifts.into_iter().map(ShiftResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn update_shift(
    State(store): State<Arc<ClinicStore>>,
    Path((provider_id, weekday)): Path<(Uuid, String)>,
    Json(request): Json<UpdateShiftRequest>,
) -> Result<Json<ShiftResponse>, AppError> {
    let weekday = parse_weekday(&weekday)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let shift = ScheduleService::new(store)
        .update_shift(provider_id, weekday, request)
        .await
        .map_err(to_app_error)?;
    Ok(Json(ShiftResponse::from(shift)))
}

#[axum::debug_handler]
pub async fn remove_shift(
    State(store): State<Arc<ClinicStore>>,
    Path((provider_id, weekday)): Path<(Uuid, String)>,
) -> Result<Json<Value>, AppError> {
    let weekday = parse_weekday(&weekday)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let removed = ScheduleService::new(store)
        .remove_shift(provider_id, weekday)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "success": true,
        "removed": ShiftResponse::from(removed)
    })))
}

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_patient(
    State(store): State<Arc<ClinicStore>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(store).create(request).await;
    Ok(Json(PatientResponse::from(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(store): State<Arc<ClinicStore>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(store)
        .get(patient_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(PatientResponse::from(patient)))
}

#[axum::debug_handler]
pub async fn activate_patient(
    State(store): State<Arc<ClinicStore>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientResponse>, AppError> {
    let patient = PatientService::new(store)
        .activate(patient_id)
        .await
        .map_err(to_app_error)?;
    Ok(Json(PatientResponse::from(patient)))
}

#[axum::debug_handler]
pub async fn deactivate_patient(
    State(store): State<Arc<ClinicStore>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let (patient, cancelled) = PatientService::new(store)
        .deactivate(patient_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "patient": PatientResponse::from(patient),
        "cancelled_appointments": cancelled
            .into_iter()
            .map(AppointmentResponse::from)
            .collect::<Vec<_>>()
    })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(store): State<Arc<ClinicStore>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    PatientService::new(Arc::clone(&store))
        .get(patient_id)
        .await
        .map_err(to_app_error)?;

    let appointments = BookingService::new(store)
        .appointments_for_patient(patient_id)
        .await;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}
