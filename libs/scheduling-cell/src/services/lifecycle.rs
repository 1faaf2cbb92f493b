// libs/scheduling-cell/src/services/lifecycle.rs
//
// The appointment state machine. SCHEDULED is the only live state; COMPLETED,
// CANCELLED and NO_SHOW are terminal. Every transition goes through the
// store's compare-and-set, so two racing transitions on one appointment
// cannot both succeed even after both passed the guards.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use shared_database::{CascadeScope, ClinicStore, StoreError};
use shared_models::{Appointment, AppointmentStatus, MedicalRecord};

use crate::models::{CompleteAppointmentRequest, SchedulingError, UpdateRecordRequest};

pub struct LifecycleService {
    store: Arc<ClinicStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    async fn load_scheduled(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        let appointment = self
            .store
            .appointment(id)
            .await
            .ok_or(SchedulingError::AppointmentNotFound)?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(SchedulingError::InvalidStateTransition(appointment.status));
        }
        Ok(appointment)
    }

    /// Translate a lost compare-and-set race into the state error the caller
    /// would have seen had it arrived second at the guard.
    async fn stale_to_transition_error(&self, id: Uuid, e: StoreError) -> SchedulingError {
        match e {
            StoreError::NotFound => SchedulingError::AppointmentNotFound,
            StoreError::StaleStatus(_) => match self.store.appointment(id).await {
                Some(current) => SchedulingError::InvalidStateTransition(current.status),
                None => SchedulingError::AppointmentNotFound,
            },
            other => SchedulingError::Storage(other.to_string()),
        }
    }

    /// Complete a started appointment and attach its clinical record.
    #[instrument(skip(self, request))]
    pub async fn complete(
        &self,
        id: Uuid,
        request: CompleteAppointmentRequest,
    ) -> Result<(Appointment, MedicalRecord), SchedulingError> {
        let appointment = self.load_scheduled(id).await?;

        if Utc::now() < appointment.start_time {
            return Err(SchedulingError::AppointmentNotYetStarted);
        }
        if self.store.record_for_appointment(id).await.is_some() {
            return Err(SchedulingError::RecordAlreadyExists);
        }

        let appointment = match self
            .store
            .transition_appointment(id, AppointmentStatus::Scheduled, AppointmentStatus::Completed)
            .await
        {
            Ok(a) => a,
            Err(e) => return Err(self.stale_to_transition_error(id, e).await),
        };

        let record = MedicalRecord::new(
            id,
            request.diagnosis,
            request.treatment_plan,
            request.prescription,
        );
        let record = self.store.insert_record(record).await.map_err(|e| match e {
            StoreError::DuplicateRecord(_) => SchedulingError::RecordAlreadyExists,
            other => SchedulingError::Storage(other.to_string()),
        })?;

        info!("completed appointment {} with record {}", id, record.id);
        Ok((appointment, record))
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.load_scheduled(id).await?;

        match self
            .store
            .transition_appointment(id, AppointmentStatus::Scheduled, AppointmentStatus::Cancelled)
            .await
        {
            Ok(appointment) => {
                info!("cancelled appointment {}", id);
                Ok(appointment)
            }
            Err(e) => Err(self.stale_to_transition_error(id, e).await),
        }
    }

    /// Mark a missed appointment. The whole slot window must have elapsed,
    /// not just the start time; a patient is not a no-show mid-slot.
    pub async fn mark_no_show(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        let appointment = self.load_scheduled(id).await?;

        let provider = self
            .store
            .provider(appointment.provider_id)
            .await
            .ok_or(SchedulingError::ProviderNotFound)?;
        let slot_end = appointment.start_time + provider.slot_duration.as_duration();
        if Utc::now() < slot_end {
            return Err(SchedulingError::AppointmentNotYetFinished);
        }

        match self
            .store
            .transition_appointment(id, AppointmentStatus::Scheduled, AppointmentStatus::NoShow)
            .await
        {
            Ok(appointment) => {
                info!("marked appointment {} as no-show", id);
                Ok(appointment)
            }
            Err(e) => Err(self.stale_to_transition_error(id, e).await),
        }
    }

    // --------------------------------------------------------------------------
    // Medical records
    // --------------------------------------------------------------------------

    pub async fn get_record(&self, appointment_id: Uuid) -> Result<MedicalRecord, SchedulingError> {
        self.store
            .appointment(appointment_id)
            .await
            .ok_or(SchedulingError::AppointmentNotFound)?;
        self.store
            .record_for_appointment(appointment_id)
            .await
            .ok_or(SchedulingError::RecordNotFound)
    }

    pub async fn update_record(
        &self,
        appointment_id: Uuid,
        request: UpdateRecordRequest,
    ) -> Result<MedicalRecord, SchedulingError> {
        self.store
            .appointment(appointment_id)
            .await
            .ok_or(SchedulingError::AppointmentNotFound)?;
        self.store
            .update_record(
                appointment_id,
                request.diagnosis,
                request.treatment_plan,
                request.prescription,
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound => SchedulingError::RecordNotFound,
                other => SchedulingError::Storage(other.to_string()),
            })
    }

    /// Delete an appointment's clinical record and reopen the appointment.
    /// Losing its record returns a COMPLETED appointment to SCHEDULED, where
    /// it can be completed again with a fresh record.
    #[instrument(skip(self))]
    pub async fn delete_record(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, SchedulingError> {
        let appointment = self
            .store
            .appointment(appointment_id)
            .await
            .ok_or(SchedulingError::AppointmentNotFound)?;
        if appointment.status != AppointmentStatus::Completed {
            return Err(SchedulingError::InvalidStateTransition(appointment.status));
        }

        self.store
            .remove_record(appointment_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => SchedulingError::RecordNotFound,
                other => SchedulingError::Storage(other.to_string()),
            })?;

        match self
            .store
            .transition_appointment(
                appointment_id,
                AppointmentStatus::Completed,
                AppointmentStatus::Scheduled,
            )
            .await
        {
            Ok(appointment) => {
                info!("reopened appointment {} after record deletion", appointment_id);
                Ok(appointment)
            }
            Err(e) => Err(self.stale_to_transition_error(appointment_id, e).await),
        }
    }

    // --------------------------------------------------------------------------
    // Administrative cascades
    // --------------------------------------------------------------------------

    /// Cancel every SCHEDULED appointment of a deactivated provider. The
    /// sweep bypasses per-appointment timing guards but never touches
    /// terminal rows.
    pub async fn cancel_all_for_provider(&self, provider_id: Uuid) -> Vec<Appointment> {
        let cancelled = self
            .store
            .cancel_all_scheduled(CascadeScope::Provider(provider_id))
            .await;
        info!(
            "cascade cancelled {} appointments for provider {}",
            cancelled.len(),
            provider_id
        );
        cancelled
    }

    pub async fn cancel_all_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let cancelled = self
            .store
            .cancel_all_scheduled(CascadeScope::Patient(patient_id))
            .await;
        info!(
            "cascade cancelled {} appointments for patient {}",
            cancelled.len(),
            patient_id
        );
        cancelled
    }
}
