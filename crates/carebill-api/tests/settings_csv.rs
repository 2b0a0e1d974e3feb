mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use carebill_core::storage_keys;
use carebill_storage::store::ObjectStore;
use common::TestApp;

async fn put_settings(app: &TestApp, token: &str, if_match: Option<&str>, name: &str) -> common::Reply {
    let mut builder = Request::builder()
        .method("PUT")
        .uri("/settings")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(etag) = if_match {
        builder = builder.header(header::IF_MATCH, etag);
    }
    let body = json!({ "practice_name": name, "default_installment_count": 4 });
    app.send(builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn put_template(app: &TestApp, token: &str, name: &str, body: &str) -> common::Reply {
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/settings/templates/{name}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.send(req).await
}

#[tokio::test]
async fn settings_updates_require_the_current_etag() {
    let app = TestApp::new();
    let staff = app.staff();

    let defaults = app.get("/settings", &staff).await;
    assert_eq!(defaults.status, StatusCode::OK);
    assert!(defaults.headers.get(header::ETAG).is_none());
    assert_eq!(defaults.json()["max_discount_percent"], 20.0);

    let first = put_settings(&app, &staff, None, "Lakeside Clinic").await;
    assert_eq!(first.status, StatusCode::OK, "{}", first.text);
    let etag = first.headers[header::ETAG].to_str().unwrap().to_string();

    assert_eq!(put_settings(&app, &staff, None, "Nope").await.status, StatusCode::CONFLICT);
    assert_eq!(
        put_settings(&app, &staff, Some("\"stale\""), "Nope").await.status,
        StatusCode::CONFLICT
    );

    let second = put_settings(&app, &staff, Some(&etag), "Lakeside Family Clinic").await;
    assert_eq!(second.status, StatusCode::OK, "{}", second.text);

    let current = app.get("/settings", &staff).await;
    assert_eq!(current.json()["practice_name"], "Lakeside Family Clinic");
    assert_eq!(current.json()["default_installment_count"], 4);
    assert_eq!(current.headers[header::ETAG], second.headers[header::ETAG]);

    assert_eq!(app.get("/settings", &app.patient(&uuid::Uuid::new_v4().to_string())).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn settings_from_a_newer_build_are_refused() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;

    let body = json!({ "settings_version": 99, "practice_name": "Lakeside Clinic" });
    app.store
        .put(storage_keys::PRACTICE_SETTINGS, body.to_string().into_bytes(), None)
        .await
        .unwrap();

    let reply = app.get("/settings", &staff).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.error().contains("settings_version"));

    let preview = app
        .post(
            "/payment-plans/preview",
            &staff,
            json!({ "patient_id": jane, "total_amount": 100.0, "installment_count": 3, "start_date": "2025-01-31" }),
        )
        .await;
    assert_eq!(preview.status, StatusCode::BAD_REQUEST);

    // the stored document is left untouched
    let stored = app.store.get(storage_keys::PRACTICE_SETTINGS).await.unwrap();
    assert_eq!(stored.body, body.to_string().into_bytes());
}

#[tokio::test]
async fn template_overrides_are_checked_and_used() {
    let app = TestApp::new();
    let staff = app.staff();
    let jane = app.seed_patient("Jane", "Doe").await;

    let default = app.get("/settings/templates/statement", &staff).await;
    assert!(default.text.contains("PATIENT STATEMENT"));

    let broken = put_template(&app, &staff, "statement", "{% if lines %}unclosed").await;
    assert_eq!(broken.status, StatusCode::BAD_REQUEST);

    let stored = put_template(&app, &staff, "statement", "Owed by {{ patient_name }}: ${{ balance_due | money }}").await;
    assert_eq!(stored.status, StatusCode::OK, "{}", stored.text);

    let statement = app.get(&format!("/patients/{jane}/statement"), &staff).await;
    assert_eq!(statement.text, "Owed by Jane Doe: $190.00");

    assert_eq!(app.delete("/settings/templates/statement", &staff).await.status, StatusCode::OK);
    let statement = app.get(&format!("/patients/{jane}/statement"), &staff).await;
    assert!(statement.text.contains("PATIENT STATEMENT"));

    assert_eq!(
        app.get("/settings/templates/invoice", &staff).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn provider_import_reports_bad_rows_and_exports_the_rest() {
    let app = TestApp::new();
    let staff = app.staff();
    let csv = "First Name,Last Name,NPI,Specialty\n\
               Ana,Lopez,1234567890,Family Medicine\n\
               Ben,Ng,12345,Cardiology\n\
               Cara,Diaz,1112223334,\n";

    let reply = app.post_text("/imports/providers", &staff, "text/csv", csv).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    let summary = reply.json();
    assert_eq!(summary["imported"], 2);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["errors"][0]["line"], 3);

    let export = app.get("/exports/providers", &staff).await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    let lines: Vec<&str> = export.text.lines().collect();
    assert_eq!(lines[0], "first_name,last_name,npi,specialty,taxonomy_code,phone,email,active");
    assert!(lines[1].starts_with("Cara,Diaz,1112223334"));
    assert!(lines[2].starts_with("Ana,Lopez,1234567890"));
}

#[tokio::test]
async fn imports_do_not_overlap() {
    let app = TestApp::new();
    let staff = app.staff();
    let csv = "name,npi\nLakeside Clinic,1234567890\n";

    {
        let _held = app.state.imports.try_begin().unwrap();
        let reply = app.post_text("/imports/facilities", &staff, "text/csv", csv).await;
        assert_eq!(reply.status, StatusCode::CONFLICT);
    }

    assert!(!app.state.imports.is_running());
    let reply = app.post_text("/imports/facilities", &staff, "text/csv", csv).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.text);
    assert_eq!(reply.json()["imported"], 1);

    let missing_column = app
        .post_text("/imports/facilities", &staff, "text/csv", "npi\n1234567890\n")
        .await;
    assert_eq!(missing_column.status, StatusCode::BAD_REQUEST);
}
