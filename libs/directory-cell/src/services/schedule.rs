// libs/directory-cell/src/services/schedule.rs
//
// Shift administration: one recurring availability window per provider per
// weekday, start strictly before end.

use std::sync::Arc;

use chrono::{NaiveTime, Weekday};
use tracing::info;
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::{parse_weekday, Shift};

use crate::models::{CreateShiftRequest, DirectoryError, UpdateShiftRequest};

pub struct ScheduleService {
    store: Arc<ClinicStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    async fn require_provider(&self, provider_id: Uuid) -> Result<(), DirectoryError> {
        self.store
            .provider(provider_id)
            .await
            .map(|_| ())
            .ok_or(DirectoryError::ProviderNotFound)
    }

    fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<(), DirectoryError> {
        if start >= end {
            return Err(DirectoryError::InvalidShiftWindow);
        }
        Ok(())
    }

    pub async fn add_shift(
        &self,
        provider_id: Uuid,
        request: CreateShiftRequest,
    ) -> Result<Shift, DirectoryError> {
        self.require_provider(provider_id).await?;
        let weekday = parse_weekday(&request.weekday)?;
        Self::validate_window(request.start_time, request.end_time)?;

        let shift = self
            .store
            .insert_shift(Shift::new(
                provider_id,
                weekday,
                request.start_time,
                request.end_time,
            ))
            .await
            .map_err(|e| match e {
                StoreError::DuplicateShift(_, weekday) => DirectoryError::DuplicateShift(weekday),
                other => DirectoryError::Storage(other.to_string()),
            })?;

        info!("added {} shift for provider {}", weekday, provider_id);
        Ok(shift)
    }

    pub async fn list_shifts(&self, provider_id: Uuid) -> Result<Vec<Shift>, DirectoryError> {
        self.require_provider(provider_id).await?;
        Ok(self.store.shifts_for_provider(provider_id).await)
    }

    pub async fn update_shift(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
        request: UpdateShiftRequest,
    ) -> Result<Shift, DirectoryError> {
        self.require_provider(provider_id).await?;
        Self::validate_window(request.start_time, request.end_time)?;

        self.store
            .update_shift_times(provider_id, weekday, request.start_time, request.end_time)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DirectoryError::ScheduleNotFound(weekday),
                other => DirectoryError::Storage(other.to_string()),
            })
    }

    pub async fn remove_shift(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
    ) -> Result<Shift, DirectoryError> {
        self.require_provider(provider_id).await?;
        let removed = self
            .store
            .remove_shift(provider_id, weekday)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DirectoryError::ScheduleNotFound(weekday),
                other => DirectoryError::Storage(other.to_string()),
            })?;

        info!("removed {} shift for provider {}", weekday, provider_id);
        Ok(removed)
    }
}
