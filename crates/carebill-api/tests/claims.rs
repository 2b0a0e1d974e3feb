mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, draft};

#[tokio::test]
async fn submitted_draft_becomes_a_claim() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;

    let reply = app.post("/claims", &staff, draft(&jane, "Jane Doe")).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    let claim = reply.json();
    assert_eq!(claim["status"], "submitted");
    assert_eq!(claim["total_amount"], 190.0);
    assert!(claim["claim_number"].as_str().unwrap().starts_with("CLM-20250227-"));
}

#[tokio::test]
async fn incomplete_or_malformed_drafts_are_refused() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;

    let mut no_insurance = draft(&jane, "Jane Doe");
    no_insurance["insurance"] = json!({});
    let reply = app.post("/claims", &staff, no_insurance).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.error().contains("Insurance"));

    let mut bad_code = draft(&jane, "Jane Doe");
    bad_code["procedures"][0]["code"] = json!("ABC");
    let reply = app.post("/claims", &staff, bad_code).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.error().contains("ABC"));

    let reply = app
        .post("/claims", &staff, draft(&uuid::Uuid::new_v4().to_string(), "Nobody"))
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.error().starts_with("unknown patient"));

    assert!(app.get("/claims", &staff).await.json().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn edit_mode_and_status_workflow() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    let claim = app.post("/claims", &staff, draft(&jane, "Jane Doe")).await.json();
    let id = claim["id"].as_str().unwrap();

    let mut edited = app.get(&format!("/claims/{id}/draft"), &staff).await.json();
    edited["procedures"][1]["units"] = json!(1);
    let reply = app.put(&format!("/claims/{id}"), &staff, edited.clone()).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    assert_eq!(reply.json()["total_amount"], 145.0);
    assert_eq!(reply.json()["claim_number"], claim["claim_number"]);

    let status = |s: &str| json!({ "status": s });
    assert_eq!(
        app.post(&format!("/claims/{id}/status"), &staff, status("paid")).await.status,
        StatusCode::CONFLICT
    );
    assert_eq!(
        app.post(&format!("/claims/{id}/status"), &staff, status("accepted")).await.status,
        StatusCode::OK
    );
    assert_eq!(
        app.put(&format!("/claims/{id}"), &staff, edited).await.status,
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn patients_list_only_their_claims() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    let john = app.seed_patient("John", "Roe").await;
    app.post("/claims", &staff, draft(&jane, "Jane Doe")).await;
    let johns = app.post("/claims", &staff, draft(&john, "John Roe")).await.json();

    let token = app.patient(&jane);
    let mine = app.get("/claims", &token).await.json();
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["patient"]["name"], "Jane Doe");

    // a patient_id filter can't widen the scope
    let sneaky = app.get(&format!("/claims?patient_id={john}"), &token).await.json();
    assert_eq!(sneaky.as_array().unwrap().len(), 1);

    let id = johns["id"].as_str().unwrap();
    assert_eq!(app.get(&format!("/claims/{id}"), &token).await.status, StatusCode::FORBIDDEN);

    assert_eq!(app.get("/claims?q=roe", &staff).await.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn statement_renders_for_the_patient() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;
    app.post("/claims", &staff, draft(&jane, "Jane Doe")).await;

    let reply = app.get(&format!("/patients/{jane}/statement"), &app.patient(&jane)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.text.contains("Jane Doe"));
    assert!(reply.text.contains("2025-02-27  submitted  $190.00"));
    assert!(reply.text.contains("Balance due: $190.00"));

}
