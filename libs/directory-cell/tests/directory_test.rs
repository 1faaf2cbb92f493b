use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use directory_cell::models::{CreatePatientRequest, CreateProviderRequest};
use directory_cell::{DirectoryError, PatientService, ProviderService};
use scheduling_cell::models::BookAppointmentRequest;
use scheduling_cell::{BookingService, SchedulingError};
use shared_database::ClinicStore;
use shared_models::{Appointment, AppointmentStatus, Patient, Provider, Shift, SlotDuration};

fn provider_request(minutes: i64) -> CreateProviderRequest {
    CreateProviderRequest {
        full_name: "Dr. Ines Fontaine".to_string(),
        slot_duration_minutes: minutes,
    }
}

#[tokio::test]
async fn provider_creation_validates_slot_duration() {
    let store = Arc::new(ClinicStore::new());
    let service = ProviderService::new(Arc::clone(&store));

    let provider = service.create(provider_request(45)).await.unwrap();
    assert!(provider.active);
    assert_eq!(provider.slot_duration, SlotDuration::Minutes45);

    assert_matches!(
        service.create(provider_request(20)).await,
        Err(DirectoryError::InvalidEnum(_))
    );
}

#[tokio::test]
async fn activation_state_changes_must_actually_change_state() {
    let store = Arc::new(ClinicStore::new());
    let providers = ProviderService::new(Arc::clone(&store));
    let patients = PatientService::new(Arc::clone(&store));

    let provider = providers.create(provider_request(30)).await.unwrap();
    assert_matches!(
        providers.activate(provider.id).await,
        Err(DirectoryError::ProviderAlreadyActive)
    );
    providers.deactivate(provider.id).await.unwrap();
    assert_matches!(
        providers.deactivate(provider.id).await,
        Err(DirectoryError::ProviderAlreadyInactive)
    );
    let reactivated = providers.activate(provider.id).await.unwrap();
    assert!(reactivated.active);

    let patient = patients
        .create(CreatePatientRequest {
            full_name: "Mara Lindqvist".to_string(),
        })
        .await;
    assert_matches!(
        patients.activate(patient.id).await,
        Err(DirectoryError::PatientAlreadyActive)
    );
    patients.deactivate(patient.id).await.unwrap();
    assert_matches!(
        patients.deactivate(patient.id).await,
        Err(DirectoryError::PatientAlreadyInactive)
    );

    assert_matches!(
        providers.get(Uuid::new_v4()).await,
        Err(DirectoryError::ProviderNotFound)
    );
    assert_matches!(
        patients.get(Uuid::new_v4()).await,
        Err(DirectoryError::PatientNotFound)
    );
}

async fn seed_appointments(
    store: &Arc<ClinicStore>,
    provider: &Provider,
    patient: &Patient,
) -> (Appointment, Appointment) {
    let scheduled = store
        .insert_appointment(Appointment::new(
            provider.id,
            patient.id,
            Utc::now() + Duration::days(1),
            "checkup",
        ))
        .await
        .unwrap();
    let completed = store
        .insert_appointment(Appointment::new(
            provider.id,
            patient.id,
            Utc::now() - Duration::hours(2),
            "follow-up",
        ))
        .await
        .unwrap();
    store
        .transition_appointment(
            completed.id,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
        )
        .await
        .unwrap();
    (scheduled, completed)
}

#[tokio::test]
async fn provider_deactivation_cascades_to_scheduled_appointments() {
    let store = Arc::new(ClinicStore::new());
    let providers = ProviderService::new(Arc::clone(&store));
    let provider = providers.create(provider_request(30)).await.unwrap();
    let patient = store.insert_patient(Patient::new("Mara Lindqvist")).await;
    let (scheduled, completed) = seed_appointments(&store, &provider, &patient).await;

    let (updated, cancelled) = providers.deactivate(provider.id).await.unwrap();
    assert!(!updated.active);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, scheduled.id);
    assert_eq!(
        store.appointment(scheduled.id).await.unwrap().status,
        AppointmentStatus::Cancelled
    );
    assert_eq!(
        store.appointment(completed.id).await.unwrap().status,
        AppointmentStatus::Completed
    );
}

#[tokio::test]
async fn patient_deactivation_cascades_to_scheduled_appointments() {
    let store = Arc::new(ClinicStore::new());
    let patients = PatientService::new(Arc::clone(&store));
    let provider = store
        .insert_provider(Provider::new("Dr. Ines Fontaine", SlotDuration::Minutes30))
        .await;
    let patient = patients
        .create(CreatePatientRequest {
            full_name: "Mara Lindqvist".to_string(),
        })
        .await;
    let (scheduled, completed) = seed_appointments(&store, &provider, &patient).await;

    let (updated, cancelled) = patients.deactivate(patient.id).await.unwrap();
    assert!(!updated.active);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, scheduled.id);
    assert_eq!(
        store.appointment(completed.id).await.unwrap().status,
        AppointmentStatus::Completed
    );
}

#[tokio::test]
async fn deactivation_waits_for_the_booking_lock_and_sweeps_afterwards() {
    let store = Arc::new(ClinicStore::new());
    let providers = ProviderService::new(Arc::clone(&store));
    let provider = providers.create(provider_request(30)).await.unwrap();
    let patient = store.insert_patient(Patient::new("Mara Lindqvist")).await;

    // Stand in for an in-flight booking that has already passed its
    // provider-active check: hold the booking lock, then commit the row
    // while a concurrent deactivation is underway.
    let guard = store.lock_provider(provider.id).await;

    let deactivation = tokio::spawn({
        let store = Arc::clone(&store);
        let provider_id = provider.id;
        async move {
            ProviderService::new(store).deactivate(provider_id).await
        }
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!deactivation.is_finished());

    let appointment = store
        .insert_appointment(Appointment::new(
            provider.id,
            patient.id,
            Utc::now() + Duration::days(1),
            "checkup",
        ))
        .await
        .unwrap();
    drop(guard);

    // The sweep ran after the booking committed, so the row is cancelled;
    // no SCHEDULED appointment survives for an inactive provider.
    let (updated, cancelled) = deactivation.await.unwrap().unwrap();
    assert!(!updated.active);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].id, appointment.id);
    assert_eq!(
        store.appointment(appointment.id).await.unwrap().status,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn deactivated_providers_accept_no_new_bookings() {
    let store = Arc::new(ClinicStore::new());
    let providers = ProviderService::new(Arc::clone(&store));
    let provider = providers.create(provider_request(30)).await.unwrap();
    let patient = store.insert_patient(Patient::new("Mara Lindqvist")).await;

    // Shift on every weekday so any future start time has a schedule.
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
    for weekday in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        store
            .insert_shift(Shift::new(provider.id, weekday, nine, five))
            .await
            .unwrap();
    }

    providers.deactivate(provider.id).await.unwrap();

    let tomorrow_nine = (Utc::now().date_naive() + Duration::days(1))
        .and_time(nine)
        .and_utc();
    let result = BookingService::new(Arc::clone(&store))
        .book(BookAppointmentRequest {
            patient_id: patient.id,
            provider_id: provider.id,
            start_time: tomorrow_nine,
            reason: "checkup".to_string(),
        })
        .await;
    assert_matches!(result, Err(SchedulingError::ProviderInactive));
}
