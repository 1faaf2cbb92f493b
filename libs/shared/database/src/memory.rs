// libs/shared/database/src/memory.rs
//
// In-process clinic store. Tables are id-keyed maps behind async RwLocks;
// every read hands out a cloned value record. Booking mutual exclusion is a
// keyed mutex per provider, and the non-cancelled (provider, start_time)
// uniqueness rule is enforced inside insert_appointment as the backstop
// behind any advisory availability check made outside the lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc, Weekday};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use shared_models::{
    Appointment, AppointmentStatus, MedicalRecord, Patient, Provider, Shift,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("provider {provider_id} already has a non-cancelled appointment at {start_time}")]
    SlotTaken {
        provider_id: Uuid,
        start_time: DateTime<Utc>,
    },

    #[error("appointment {0} is no longer in the expected status")]
    StaleStatus(Uuid),

    #[error("a medical record already exists for appointment {0}")]
    DuplicateRecord(Uuid),

    #[error("provider {0} already has a shift on {1}")]
    DuplicateShift(Uuid, Weekday),
}

/// Target of a batch cancellation sweep.
#[derive(Debug, Clone, Copy)]
pub enum CascadeScope {
    Provider(Uuid),
    Patient(Uuid),
}

#[derive(Default)]
pub struct ClinicStore {
    providers: RwLock<HashMap<Uuid, Provider>>,
    patients: RwLock<HashMap<Uuid, Patient>>,
    shifts: RwLock<HashMap<(Uuid, Weekday), Shift>>,
    appointments: RwLock<HashMap<Uuid, Appointment>>,
    records: RwLock<HashMap<Uuid, MedicalRecord>>,
    booking_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // PROVIDERS
    // ==========================================================================

    pub async fn insert_provider(&self, provider: Provider) -> Provider {
        let mut providers = self.providers.write().await;
        providers.insert(provider.id, provider.clone());
        provider
    }

    pub async fn provider(&self, id: Uuid) -> Option<Provider> {
        self.providers.read().await.get(&id).cloned()
    }

    pub async fn set_provider_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Provider, StoreError> {
        let mut providers = self.providers.write().await;
        let provider = providers.get_mut(&id).ok_or(StoreError::NotFound)?;
        provider.active = active;
        provider.updated_at = Utc::now();
        Ok(provider.clone())
    }

    // ==========================================================================
    // PATIENTS
    // ==========================================================================

    pub async fn insert_patient(&self, patient: Patient) -> Patient {
        let mut patients = self.patients.write().await;
        patients.insert(patient.id, patient.clone());
        patient
    }

    pub async fn patient(&self, id: Uuid) -> Option<Patient> {
        self.patients.read().await.get(&id).cloned()
    }

    pub async fn set_patient_active(
        &self,
        id: Uuid,
        active: bool,
    ) -> Result<Patient, StoreError> {
        let mut patients = self.patients.write().await;
        let patient = patients.get_mut(&id).ok_or(StoreError::NotFound)?;
        patient.active = active;
        patient.updated_at = Utc::now();
        Ok(patient.clone())
    }

    // ==========================================================================
    // SHIFTS
    // ==========================================================================

    /// Insert a shift, enforcing at most one per (provider, weekday).
    pub async fn insert_shift(&self, shift: Shift) -> Result<Shift, StoreError> {
        let mut shifts = self.shifts.write().await;
        let key = (shift.provider_id, shift.weekday);
        if shifts.contains_key(&key) {
            return Err(StoreError::DuplicateShift(shift.provider_id, shift.weekday));
        }
        shifts.insert(key, shift.clone());
        Ok(shift)
    }

    pub async fn shift(&self, provider_id: Uuid, weekday: Weekday) -> Option<Shift> {
        self.shifts.read().await.get(&(provider_id, weekday)).cloned()
    }

    pub async fn shifts_for_provider(&self, provider_id: Uuid) -> Vec<Shift> {
        let shifts = self.shifts.read().await;
        let mut result: Vec<Shift> = shifts
            .values()
            .filter(|s| s.provider_id == provider_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.weekday.num_days_from_monday());
        result
    }

    pub async fn update_shift_times(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
        start_time: chrono::NaiveTime,
        end_time: chrono::NaiveTime,
    ) -> Result<Shift, StoreError> {
        let mut shifts = self.shifts.write().await;
        let shift = shifts
            .get_mut(&(provider_id, weekday))
            .ok_or(StoreError::NotFound)?;
        shift.start_time = start_time;
        shift.end_time = end_time;
        Ok(shift.clone())
    }

    pub async fn remove_shift(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
    ) -> Result<Shift, StoreError> {
        let mut shifts = self.shifts.write().await;
        shifts
            .remove(&(provider_id, weekday))
            .ok_or(StoreError::NotFound)
    }

    // ==========================================================================
    // APPOINTMENTS
    // ==========================================================================

    /// Acquire the exclusive booking lock for one provider. Callers hold the
    /// returned guard across their validate-and-insert sequence; locks for
    /// distinct providers are independent.
    pub async fn lock_provider(&self, provider_id: Uuid) -> OwnedMutexGuard<()> {
        let row_lock = {
            let mut locks = self.booking_locks.lock().await;
            Arc::clone(locks.entry(provider_id).or_default())
        };
        debug!("acquiring booking lock for provider {}", provider_id);
        row_lock.lock_owned().await
    }

    /// Insert a new appointment. Fails with SlotTaken when a non-cancelled
    /// appointment for the same provider and start time already exists; this
    /// is the uniqueness constraint the double-booking guarantee rests on.
    pub async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        let taken = appointments.values().any(|a| {
            a.provider_id == appointment.provider_id
                && a.start_time == appointment.start_time
                && a.status != AppointmentStatus::Cancelled
        });
        if taken {
            return Err(StoreError::SlotTaken {
                provider_id: appointment.provider_id,
                start_time: appointment.start_time,
            });
        }
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    pub async fn appointment(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.read().await.get(&id).cloned()
    }

    pub async fn has_active_booking_at(
        &self,
        provider_id: Uuid,
        start_time: DateTime<Utc>,
    ) -> bool {
        self.appointments.read().await.values().any(|a| {
            a.provider_id == provider_id
                && a.start_time == start_time
                && a.status != AppointmentStatus::Cancelled
        })
    }

    /// All appointments for one provider with `from <= start_time < to`.
    pub async fn appointments_for_provider_between(
        &self,
        provider_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| {
                a.provider_id == provider_id && a.start_time >= from && a.start_time < to
            })
            .cloned()
            .collect();
        result.sort_by_key(|a| a.start_time);
        result
    }

    pub async fn appointments_for_provider(&self, provider_id: Uuid) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.provider_id == provider_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.start_time);
        result
    }

    pub async fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.start_time);
        result
    }

    /// Atomic compare-and-set on appointment status. Fails with StaleStatus
    /// when the row is not in `from` anymore, so concurrent transitions on
    /// the same appointment cannot both succeed.
    pub async fn transition_appointment(
        &self,
        id: Uuid,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments.get_mut(&id).ok_or(StoreError::NotFound)?;
        if appointment.status != from {
            return Err(StoreError::StaleStatus(id));
        }
        appointment.status = to;
        appointment.updated_at = Utc::now();
        debug!("appointment {} transitioned {} -> {}", id, from, to);
        Ok(appointment.clone())
    }

    /// Batch-cancel every SCHEDULED appointment in scope, atomically under
    /// the table write lock. Non-SCHEDULED rows are left untouched.
    pub async fn cancel_all_scheduled(&self, scope: CascadeScope) -> Vec<Appointment> {
        let mut appointments = self.appointments.write().await;
        let now = Utc::now();
        let mut cancelled = Vec::new();
        for appointment in appointments.values_mut() {
            let in_scope = match scope {
                CascadeScope::Provider(id) => appointment.provider_id == id,
                CascadeScope::Patient(id) => appointment.patient_id == id,
            };
            if in_scope && appointment.status == AppointmentStatus::Scheduled {
                appointment.status = AppointmentStatus::Cancelled;
                appointment.updated_at = now;
                cancelled.push(appointment.clone());
            }
        }
        debug!("cascade cancelled {} appointments for {:?}", cancelled.len(), scope);
        cancelled
    }

    // ==========================================================================
    // MEDICAL RECORDS
    // ==========================================================================

    /// Insert a record; at most one may exist per appointment.
    pub async fn insert_record(
        &self,
        record: MedicalRecord,
    ) -> Result<MedicalRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.appointment_id) {
            return Err(StoreError::DuplicateRecord(record.appointment_id));
        }
        records.insert(record.appointment_id, record.clone());
        Ok(record)
    }

    pub async fn record_for_appointment(&self, appointment_id: Uuid) -> Option<MedicalRecord> {
        self.records.read().await.get(&appointment_id).cloned()
    }

    pub async fn update_record(
        &self,
        appointment_id: Uuid,
        diagnosis: String,
        treatment_plan: Option<String>,
        prescription: Option<String>,
    ) -> Result<MedicalRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&appointment_id).ok_or(StoreError::NotFound)?;
        record.diagnosis = diagnosis;
        record.treatment_plan = treatment_plan;
        record.prescription = prescription;
        Ok(record.clone())
    }

    pub async fn remove_record(
        &self,
        appointment_id: Uuid,
    ) -> Result<MedicalRecord, StoreError> {
        let mut records = self.records.write().await;
        records.remove(&appointment_id).ok_or(StoreError::NotFound)
    }
}
