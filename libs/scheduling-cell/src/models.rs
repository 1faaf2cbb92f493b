// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{Appointment, AppointmentStatus, MedicalRecord};

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub provider_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlotsResponse {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompleteAppointmentRequest {
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub prescription: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecordRequest {
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub prescription: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            provider_id: a.provider_id,
            patient_id: a.patient_id,
            start_time: a.start_time,
            reason: a.reason,
            status: a.status.to_string(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicalRecordResponse {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub prescription: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<MedicalRecord> for MedicalRecordResponse {
    fn from(r: MedicalRecord) -> Self {
        Self {
            id: r.id,
            appointment_id: r.appointment_id,
            diagnosis: r.diagnosis,
            treatment_plan: r.treatment_plan,
            prescription: r.prescription,
            created_at: r.created_at,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Provider is not active")]
    ProviderInactive,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("No medical record exists for this appointment")]
    RecordNotFound,

    #[error("Provider has no schedule on {0}")]
    NoScheduleForDay(Weekday),

    #[error("Requested time is outside the provider's working hours")]
    OutsideWorkingHours,

    #[error("Requested time does not align with the provider's slot grid")]
    MisalignedSlot,

    #[error("Requested time is in the past")]
    PastDate,

    #[error("Appointment has not started yet")]
    AppointmentNotYetStarted,

    #[error("Appointment slot has not finished yet")]
    AppointmentNotYetFinished,

    #[error("Slot is no longer available")]
    SlotUnavailable,

    #[error("Appointment is {0}; transitions are not allowed from COMPLETED, CANCELLED or NO_SHOW")]
    InvalidStateTransition(AppointmentStatus),

    #[error("A medical record already exists for this appointment")]
    RecordAlreadyExists,

    #[error("Storage error: {0}")]
    Storage(String),
}
