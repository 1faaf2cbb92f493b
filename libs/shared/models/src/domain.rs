// libs/shared/models/src/domain.rs
use std::fmt;

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use thiserror::Error;
use uuid::Uuid;

/// Raised when a caller-supplied enum value does not parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized {field} value: {value}")]
pub struct EnumParseError {
    pub field: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

// ==============================================================================
// ENUMERATIONS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    pub fn parse(value: &str) -> Result<Self, EnumParseError> {
        match value.to_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "NO_SHOW" => Ok(AppointmentStatus::NoShow),
            _ => Err(EnumParseError::new("appointment status", value)),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "SCHEDULED"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
            AppointmentStatus::NoShow => write!(f, "NO_SHOW"),
        }
    }
}

/// Fixed appointment lengths a provider can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDuration {
    Minutes15,
    Minutes30,
    Minutes45,
    Minutes60,
}

impl SlotDuration {
    pub fn minutes(&self) -> i64 {
        match self {
            SlotDuration::Minutes15 => 15,
            SlotDuration::Minutes30 => 30,
            SlotDuration::Minutes45 => 45,
            SlotDuration::Minutes60 => 60,
        }
    }

    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.minutes())
    }

    pub fn from_minutes(minutes: i64) -> Result<Self, EnumParseError> {
        match minutes {
            15 => Ok(SlotDuration::Minutes15),
            30 => Ok(SlotDuration::Minutes30),
            45 => Ok(SlotDuration::Minutes45),
            60 => Ok(SlotDuration::Minutes60),
            _ => Err(EnumParseError::new(
                "slot duration",
                &minutes.to_string(),
            )),
        }
    }
}

/// Full uppercase weekday name, the inverse of [`parse_weekday`].
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Case-insensitive weekday parse, accepting full names or three-letter
/// abbreviations ("monday", "MON", ...).
pub fn parse_weekday(value: &str) -> Result<Weekday, EnumParseError> {
    match value.to_uppercase().as_str() {
        "MONDAY" | "MON" => Ok(Weekday::Mon),
        "TUESDAY" | "TUE" => Ok(Weekday::Tue),
        "WEDNESDAY" | "WED" => Ok(Weekday::Wed),
        "THURSDAY" | "THU" => Ok(Weekday::Thu),
        "FRIDAY" | "FRI" => Ok(Weekday::Fri),
        "SATURDAY" | "SAT" => Ok(Weekday::Sat),
        "SUNDAY" | "SUN" => Ok(Weekday::Sun),
        _ => Err(EnumParseError::new("weekday", value)),
    }
}

// ==============================================================================
// DOMAIN RECORDS
// ==============================================================================
//
// Plain value records keyed by id. All cross-entity navigation goes through
// the store by identifier; no embedded object graphs.

#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub id: Uuid,
    pub full_name: String,
    pub slot_duration: SlotDuration,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    pub fn new(full_name: impl Into<String>, slot_duration: SlotDuration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            slot_duration,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One recurring weekly availability window. At most one shift exists per
/// (provider, weekday), and start_time < end_time.
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Shift {
    pub fn new(
        provider_id: Uuid,
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider_id,
            weekday,
            start_time,
            end_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        provider_id: Uuid,
        patient_id: Uuid,
        start_time: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            provider_id,
            patient_id,
            start_time,
            reason: reason.into(),
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Clinical outcome attached 1:1 to a completed appointment, keyed by the
/// appointment id.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    pub prescription: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn new(
        appointment_id: Uuid,
        diagnosis: impl Into<String>,
        treatment_plan: Option<String>,
        prescription: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            appointment_id,
            diagnosis: diagnosis.into(),
            treatment_plan,
            prescription,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(
            AppointmentStatus::parse("scheduled").unwrap(),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            AppointmentStatus::parse("No_Show").unwrap(),
            AppointmentStatus::NoShow
        );
        assert!(AppointmentStatus::parse("pending").is_err());
    }

    #[test]
    fn slot_duration_accepts_only_supported_lengths() {
        assert_eq!(SlotDuration::from_minutes(30).unwrap().minutes(), 30);
        assert!(SlotDuration::from_minutes(20).is_err());
    }

    #[test]
    fn weekday_parse_accepts_abbreviations() {
        assert_eq!(parse_weekday("mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Friday").unwrap(), Weekday::Fri);
        assert!(parse_weekday("someday").is_err());
        assert_eq!(parse_weekday(weekday_name(Weekday::Wed)).unwrap(), Weekday::Wed);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!AppointmentStatus::Scheduled.is_terminal());
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(AppointmentStatus::NoShow.is_terminal());
    }
}
