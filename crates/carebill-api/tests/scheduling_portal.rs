mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::TestApp;

fn appointment(patient_id: &str, provider_id: &str, start: &str, minutes: u32) -> Value {
    json!({
        "patient_id": patient_id,
        "provider_id": provider_id,
        "start": start,
        "duration_minutes": minutes,
        "kind": "Follow-up",
    })
}

#[tokio::test]
async fn double_booking_a_provider_is_a_conflict() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    let john = app.seed_patient("John", "Roe").await;
    let provider = app.seed_provider("1234567890").await;
    let provider_id = provider["id"].as_str().unwrap();

    let first = app
        .post("/appointments", &staff, appointment(&jane, provider_id, "2025-03-03T09:00:00", 30))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.text);
    let first_id = first.json()["id"].as_str().unwrap().to_string();

    let clash = app
        .post("/appointments", &staff, appointment(&john, provider_id, "2025-03-03T09:15:00", 30))
        .await;
    assert_eq!(clash.status, StatusCode::CONFLICT);
    assert!(clash.error().contains(&first_id));

    // back to back is fine
    let adjacent = app
        .post("/appointments", &staff, appointment(&john, provider_id, "2025-03-03T09:30:00", 30))
        .await;
    assert_eq!(adjacent.status, StatusCode::OK);

    // once cancelled the slot frees up
    let mut cancelled = first.json();
    cancelled["status"] = json!("cancelled");
    let reply = app.put(&format!("/appointments/{first_id}"), &staff, cancelled).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);

    let rebooked = app
        .post("/appointments", &staff, appointment(&john, provider_id, "2025-03-03T09:00:00", 15))
        .await;
    assert_eq!(rebooked.status, StatusCode::OK);
}

#[tokio::test]
async fn calendar_filters_by_day_and_provider() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    let ana = app.seed_provider("1234567890").await;
    let ben = app.seed_provider("0987654321").await;
    let ana_id = ana["id"].as_str().unwrap();
    let ben_id = ben["id"].as_str().unwrap();

    for (provider, start) in [
        (ana_id, "2025-03-04T14:00:00"),
        (ana_id, "2025-03-03T10:00:00"),
        (ben_id, "2025-03-03T08:00:00"),
    ] {
        let reply = app.post("/appointments", &staff, appointment(&jane, provider, start, 20)).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    }

    let day = app.get("/appointments?date=2025-03-03", &staff).await.json();
    let starts: Vec<&str> = day.as_array().unwrap().iter().map(|a| a["start"].as_str().unwrap()).collect();
    assert_eq!(starts, vec!["2025-03-03T08:00:00", "2025-03-03T10:00:00"]);

    let anas = app.get(&format!("/appointments?provider_id={ana_id}"), &staff).await.json();
    assert_eq!(anas.as_array().unwrap().len(), 2);

    let zero = app
        .post("/appointments", &staff, appointment(&jane, ana_id, "2025-03-05T09:00:00", 0))
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let unknown_provider = app
        .post(
            "/appointments",
            &staff,
            appointment(&jane, &uuid::Uuid::new_v4().to_string(), "2025-03-05T09:00:00", 15),
        )
        .await;
    assert_eq!(unknown_provider.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn portal_thread_polling_and_read_receipts() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    let john = app.seed_patient("John", "Roe").await;
    let patient = app.patient(&jane);
    let uri = format!("/messages/{jane}");

    let question = app
        .post(&uri, &patient, json!({ "body": "Why was my claim denied?" }))
        .await
        .json();
    assert_eq!(question["author_role"], "patient");
    assert_eq!(question["author_name"], "Jane Doe");

    assert_eq!(app.post(&uri, &staff, json!({ "body": "  " })).await.status, StatusCode::BAD_REQUEST);
    let answer = app
        .post(&uri, &staff, json!({ "body": "Looking into it now." }))
        .await
        .json();
    assert_eq!(answer["author_role"], "staff");

    let since = question["sent_at"].as_str().unwrap();
    let newer = app.get(&format!("{uri}?since={since}"), &patient).await.json();
    assert_eq!(newer.as_array().unwrap().len(), 1);
    assert_eq!(newer[0]["body"], "Looking into it now.");

    let thread = app.get(&uri, &patient).await.json();
    assert_eq!(thread.as_array().unwrap().len(), 2);

    // the patient only marks staff messages read
    let changed = app.post(&format!("{uri}/read"), &patient, json!({})).await.json();
    assert_eq!(changed, 1);
    let again = app.post(&format!("{uri}/read"), &patient, json!({})).await.json();
    assert_eq!(again, 0);

    assert_eq!(
        app.get(&format!("/messages/{john}"), &patient).await.status,
        StatusCode::FORBIDDEN
    );
}
