// libs/directory-cell/src/services/directory.rs
//
// Provider and patient administration. Deactivation is the administrative
// override that sweeps the subject's SCHEDULED appointments to CANCELLED;
// the sweep itself lives in the scheduling cell's lifecycle service.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use scheduling_cell::LifecycleService;
use shared_database::ClinicStore;
use shared_models::{Appointment, Patient, Provider, SlotDuration};

use crate::models::{CreatePatientRequest, CreateProviderRequest, DirectoryError};

pub struct ProviderService {
    store: Arc<ClinicStore>,
}

impl ProviderService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        request: CreateProviderRequest,
    ) -> Result<Provider, DirectoryError> {
        let slot_duration = SlotDuration::from_minutes(request.slot_duration_minutes)?;
        let provider = self
            .store
            .insert_provider(Provider::new(request.full_name, slot_duration))
            .await;
        info!("created provider {}", provider.id);
        Ok(provider)
    }

    pub async fn get(&self, id: Uuid) -> Result<Provider, DirectoryError> {
        self.store
            .provider(id)
            .await
            .ok_or(DirectoryError::ProviderNotFound)
    }

    pub async fn activate(&self, id: Uuid) -> Result<Provider, DirectoryError> {
        let provider = self.get(id).await?;
        if provider.active {
            return Err(DirectoryError::ProviderAlreadyActive);
        }
        self.store
            .set_provider_active(id, true)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))
    }

    /// Deactivate a provider and cancel all of their SCHEDULED appointments.
    /// Returns the updated provider together with the cancelled rows.
    #[instrument(skip(self))]
    pub async fn deactivate(
        &self,
        id: Uuid,
    ) -> Result<(Provider, Vec<Appointment>), DirectoryError> {
        self.get(id).await?;

        // The flag flip and the sweep share the provider's booking lock with
        // the booking path. A book call that already read active == true must
        // commit its row before the sweep runs, or not at all; without the
        // lock its insert could land after the sweep and survive.
        let _guard = self.store.lock_provider(id).await;

        let provider = self.get(id).await?;
        if !provider.active {
            return Err(DirectoryError::ProviderAlreadyInactive);
        }

        let provider = self
            .store
            .set_provider_active(id, false)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        let cancelled = LifecycleService::new(Arc::clone(&self.store))
            .cancel_all_for_provider(id)
            .await;
        Ok((provider, cancelled))
    }
}

pub struct PatientService {
    store: Arc<ClinicStore>,
}

impl PatientService {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Patient {
        let patient = self.store.insert_patient(Patient::new(request.full_name)).await;
        info!("created patient {}", patient.id);
        patient
    }

    pub async fn get(&self, id: Uuid) -> Result<Patient, DirectoryError> {
        self.store
            .patient(id)
            .await
            .ok_or(DirectoryError::PatientNotFound)
    }

    pub async fn activate(&self, id: Uuid) -> Result<Patient, DirectoryError> {
        let patient = self.get(id).await?;
        if patient.active {
            return Err(DirectoryError::PatientAlreadyActive);
        }
        self.store
            .set_patient_active(id, true)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn deactivate(
        &self,
        id: Uuid,
    ) -> Result<(Patient, Vec<Appointment>), DirectoryError> {
        let patient = self.get(id).await?;
        if !patient.active {
            return Err(DirectoryError::PatientAlreadyInactive);
        }

        let patient = self
            .store
            .set_patient_active(id, false)
            .await
            .map_err(|e| DirectoryError::Storage(e.to_string()))?;

        let cancelled = LifecycleService::new(Arc::clone(&self.store))
            .cancel_all_for_patient(id)
            .await;
        Ok((patient, cancelled))
    }
}
