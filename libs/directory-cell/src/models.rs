// libs/directory-cell/src/models.rs
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::{weekday_name, EnumParseError, Patient, Provider, Shift};

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProviderRequest {
    pub full_name: String,
    pub slot_duration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShiftRequest {
    pub weekday: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShiftRequest {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderResponse {
    pub id: Uuid,
    pub full_name: String,
    pub slot_duration_minutes: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Provider> for ProviderResponse {
    fn from(p: Provider) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            slot_duration_minutes: p.slot_duration.minutes(),
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientResponse {
    pub id: Uuid,
    pub full_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Patient> for PatientResponse {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            active: p.active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub weekday: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<Shift> for ShiftResponse {
    fn from(s: Shift) -> Self {
        Self {
            id: s.id,
            provider_id: s.provider_id,
            weekday: weekday_name(s.weekday).to_string(),
            start_time: s.start_time,
            end_time: s.end_time,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("No shift exists for this provider on {0}")]
    ScheduleNotFound(Weekday),

    #[error(transparent)]
    InvalidEnum(#[from] EnumParseError),

    #[error("Shift start time must be before end time")]
    InvalidShiftWindow,

    #[error("Provider already has a shift on {0}")]
    DuplicateShift(Weekday),

    #[error("Provider is already active")]
    ProviderAlreadyActive,

    #[error("Provider is already inactive")]
    ProviderAlreadyInactive,

    #[error("Patient is already active")]
    PatientAlreadyActive,

    #[error("Patient is already inactive")]
    PatientAlreadyInactive,

    #[error("Storage error: {0}")]
    Storage(String),
}
