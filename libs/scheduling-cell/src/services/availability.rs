// libs/scheduling-cell/src/services/availability.rs
//
// Slot calculation: project a provider's recurring weekly shift onto one
// calendar date and subtract booked and already-passed start times. Read
// only; the authoritative availability check lives in the booking service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::AppointmentStatus;

use crate::models::SchedulingError;

pub struct SlotService {
    store: Arc<ClinicStore>,
}

impl SlotService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    /// Compute the ordered bookable start times for one provider on one date.
    ///
    /// Dates strictly before today yield an empty list, before the provider
    /// is even looked up; there is no retroactive availability to validate.
    /// For today, slots whose start time is already behind the wall clock
    /// are dropped; a slot starting exactly now is kept. A slot ending
    /// exactly at shift end is valid.
    pub async fn compute_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        let now = Utc::now();

        if date < now.date_naive() {
            debug!("slot query for past date {}, returning empty", date);
            return Ok(Vec::new());
        }

        let provider = self
            .store
            .provider(provider_id)
            .await
            .ok_or(SchedulingError::ProviderNotFound)?;
        if !provider.active {
            return Err(SchedulingError::ProviderInactive);
        }

        let weekday = date.weekday();
        let shift = self
            .store
            .shift(provider_id, weekday)
            .await
            .ok_or(SchedulingError::NoScheduleForDay(weekday))?;

        // Work in the UTC instant domain so the arithmetic cannot wrap at
        // midnight the way naive time-of-day addition would.
        let day_start = date.and_time(shift.start_time).and_utc();
        let day_end = date.and_time(shift.end_time).and_utc();
        let step = provider.slot_duration.as_duration();

        let booked: HashSet<_> = self
            .store
            .appointments_for_provider_between(provider_id, day_start, day_end)
            .await
            .into_iter()
            .filter(|a| a.status != AppointmentStatus::Cancelled)
            .map(|a| a.start_time)
            .collect();

        let mut slots = Vec::new();
        let mut candidate = day_start;
        while candidate + step <= day_end {
            let passed = date == now.date_naive() && candidate < now;
            if !passed && !booked.contains(&candidate) {
                slots.push(candidate.time());
            }
            candidate += step;
        }

        debug!(
            "computed {} open slots for provider {} on {}",
            slots.len(),
            provider_id,
            date
        );
        Ok(slots)
    }
}
