// libs/scheduling-cell/src/services/booking.rs
//
// Booking coordination. All validation and the insert run while holding the
// provider's exclusive booking lock, so two concurrent requests for one
// provider are totally ordered. The slot list handed out by the availability
// service is advisory; the non-cancelled uniqueness re-check here, plus the
// store's insert-time constraint, is what actually prevents double-booking.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::Appointment;

use crate::models::{BookAppointmentRequest, SchedulingError};

pub struct BookingService {
    store: Arc<ClinicStore>,
}

impl BookingService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request), fields(provider_id = %request.provider_id))]
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let start_time = request.start_time;

        // Cheap rejection before taking the lock. Time only moves forward,
        // so this cannot become valid again inside the lock.
        if start_time < Utc::now() {
            return Err(SchedulingError::PastDate);
        }

        let _guard = self.store.lock_provider(request.provider_id).await;

        let provider = self
            .store
            .provider(request.provider_id)
            .await
            .ok_or(SchedulingError::ProviderNotFound)?;
        if !provider.active {
            return Err(SchedulingError::ProviderInactive);
        }

        let date = start_time.date_naive();
        let weekday = date.weekday();
        let shift = self
            .store
            .shift(provider.id, weekday)
            .await
            .ok_or(SchedulingError::NoScheduleForDay(weekday))?;

        let day_start = date.and_time(shift.start_time).and_utc();
        let day_end = date.and_time(shift.end_time).and_utc();
        let duration = provider.slot_duration.as_duration();

        if start_time < day_start || start_time + duration > day_end {
            return Err(SchedulingError::OutsideWorkingHours);
        }

        // Alignment against the shift-start grid, measured in seconds.
        let offset = (start_time - day_start).num_seconds();
        if offset % duration.num_seconds() != 0 {
            return Err(SchedulingError::MisalignedSlot);
        }

        // Authoritative availability check, protected by the provider lock.
        if self
            .store
            .has_active_booking_at(provider.id, start_time)
            .await
        {
            warn!(
                "slot {} for provider {} already taken",
                start_time, provider.id
            );
            return Err(SchedulingError::SlotUnavailable);
        }

        self.store
            .patient(request.patient_id)
            .await
            .ok_or(SchedulingError::PatientNotFound)?;

        let appointment = Appointment::new(
            provider.id,
            request.patient_id,
            start_time,
            request.reason,
        );
        let appointment = self
            .store
            .insert_appointment(appointment)
            .await
            .map_err(|e| match e {
                StoreError::SlotTaken { .. } => SchedulingError::SlotUnavailable,
                other => SchedulingError::Storage(other.to_string()),
            })?;

        info!(
            "booked appointment {} for provider {} at {}",
            appointment.id, appointment.provider_id, appointment.start_time
        );
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.store
            .appointment(id)
            .await
            .ok_or(SchedulingError::AppointmentNotFound)
    }

    pub async fn appointments_for_provider(&self, provider_id: Uuid) -> Vec<Appointment> {
        self.store.appointments_for_provider(provider_id).await
    }

    pub async fn appointments_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.store.appointments_for_patient(patient_id).await
    }
}
