use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use scheduling_cell::appointment_routes;
use shared_database::ClinicStore;
use shared_models::{Patient, Provider, Shift, SlotDuration};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn next_future_date(weekday: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(1);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

struct TestApp {
    router: Router,
    provider_id: Uuid,
    patient_id: Uuid,
    monday: NaiveDate,
}

impl TestApp {
    /// Provider with thirty-minute slots and a one-hour Monday shift, so the
    /// whole day is exactly two slots.
    async fn new() -> Self {
        let store = Arc::new(ClinicStore::new());
        let provider = store
            .insert_provider(Provider::new("Dr. Ines Fontaine", SlotDuration::Minutes30))
            .await;
        store
            .insert_shift(Shift::new(provider.id, Weekday::Mon, t(9, 0), t(10, 0)))
            .await
            .unwrap();
        let patient = store.insert_patient(Patient::new("Mara Lindqvist")).await;

        Self {
            router: appointment_routes(Arc::clone(&store)),
            provider_id: provider.id,
            patient_id: patient.id,
            monday: next_future_date(Weekday::Mon),
        }
    }

    async fn slots(&self) -> (StatusCode, Value) {
        let uri = format!(
            "/slots?provider_id={}&date={}",
            self.provider_id, self.monday
        );
        send(&self.router, Method::GET, &uri, None).await
    }

    async fn book(&self, time: NaiveTime) -> (StatusCode, Value) {
        let body = json!({
            "patient_id": self.patient_id,
            "provider_id": self.provider_id,
            "start_time": self.monday.and_time(time).and_utc(),
            "reason": "checkup",
        });
        send(&self.router, Method::POST, "/", Some(body)).await
    }
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let app = TestApp::new().await;

    // Both slots of the one-hour shift start out open.
    let (status, body) = app.slots().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"], json!(["09:00:00", "09:30:00"]));

    // Booking 09:00 succeeds and the slot disappears.
    let (status, body) = app.book(t(9, 0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["appointment"]["status"], "SCHEDULED");
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.slots().await;
    assert_eq!(body["slots"], json!(["09:30:00"]));

    // The same slot again is a conflict.
    let (status, body) = app.book(t(9, 0)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    // Cancelling frees the slot.
    let uri = format!("/{}/cancel", appointment_id);
    let (status, body) = send(&app.router, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "CANCELLED");

    let (_, body) = app.slots().await;
    assert_eq!(body["slots"], json!(["09:00:00", "09:30:00"]));
}

#[tokio::test]
async fn scheduling_errors_map_to_http_statuses() {
    let app = TestApp::new().await;

    // Unknown provider: 404.
    let uri = format!("/slots?provider_id={}&date={}", Uuid::new_v4(), app.monday);
    let (status, _) = send(&app.router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Misaligned booking: 400.
    let (status, _) = app.book(t(9, 15)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown appointment: 404.
    let uri = format!("/{}", Uuid::new_v4());
    let (status, _) = send(&app.router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Completing a future appointment: 400.
    let (_, body) = app.book(t(9, 30)).await;
    let id = body["appointment"]["id"].as_str().unwrap().to_string();
    let uri = format!("/{}/complete", id);
    let complete = json!({ "diagnosis": "n/a", "treatment_plan": null, "prescription": null });
    let (status, _) = send(&app.router, Method::POST, &uri, Some(complete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Cancelling twice: 409.
    let uri = format!("/{}/cancel", id);
    let (status, _) = send(&app.router, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app.router, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // No record for an uncompleted appointment: 404.
    let (_, body) = app.book(t(9, 30)).await;
    let id = body["appointment"]["id"].as_str().unwrap();
    let uri = format!("/{}/record", id);
    let (status, _) = send(&app.router, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
