//! carebill-api
//!
//! HTTP API for the billing front end: registries, claims, payment plans,
//! collections, scheduling and the patient portal. Runs on Lambda in
//! production; [`router`] is also what the integration tests drive.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use carebill_core::models::facility::Facility;
use carebill_core::models::payer::Payer;
use carebill_core::models::patient::Patient;
use carebill_core::models::provider::Provider;

use routes::registry;
use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // Registries
        .route(
            "/patients",
            get(registry::list::<Patient>).post(registry::create::<Patient>),
        )
        .route(
            "/patients/{id}",
            get(routes::patients::get_patient)
                .put(registry::update::<Patient>)
                .delete(registry::remove::<Patient>),
        )
        .route(
            "/patients/{id}/eligibility",
            get(routes::patients::latest_eligibility).post(routes::patients::record_eligibility),
        )
        .route(
            "/patients/{id}/eligibility/history",
            get(routes::patients::eligibility_history),
        )
        .route(
            "/patients/{id}/statement",
            get(routes::statements::patient_statement),
        )
        .route(
            "/providers",
            get(registry::list::<Provider>).post(registry::create::<Provider>),
        )
        .route(
            "/providers/{id}",
            get(registry::get::<Provider>)
                .put(registry::update::<Provider>)
                .delete(registry::remove::<Provider>),
        )
        .route(
            "/facilities",
            get(registry::list::<Facility>).post(registry::create::<Facility>),
        )
        .route(
            "/facilities/{id}",
            get(registry::get::<Facility>)
                .put(registry::update::<Facility>)
                .delete(registry::remove::<Facility>),
        )
        .route(
            "/payers",
            get(registry::list::<Payer>).post(registry::create::<Payer>),
        )
        .route(
            "/payers/{id}",
            get(registry::get::<Payer>)
                .put(registry::update::<Payer>)
                .delete(registry::remove::<Payer>),
        )
        // CSV
        .route("/exports/providers", get(routes::transfer::export_providers))
        .route("/exports/facilities", get(routes::transfer::export_facilities))
        .route("/imports/providers", post(routes::transfer::import_providers))
        .route("/imports/facilities", post(routes::transfer::import_facilities))
        // Claims
        .route(
            "/claims",
            get(routes::claims::list_claims).post(routes::claims::submit_claim),
        )
        .route(
            "/claims/{id}",
            get(routes::claims::get_claim).put(routes::claims::edit_claim),
        )
        .route("/claims/{id}/draft", get(routes::claims::claim_draft))
        .route("/claims/{id}/status", post(routes::claims::update_status))
        // Codes
        .route("/codes", get(routes::codes::list_code_sets))
        .route("/codes/{set}", get(routes::codes::search_codes))
        .route("/codes/{set}/{code}", get(routes::codes::lookup_code))
        // Payment plans
        .route(
            "/payment-plans",
            get(routes::payment_plans::list_plans).post(routes::payment_plans::create_plan),
        )
        .route(
            "/payment-plans/preview",
            post(routes::payment_plans::preview_plan),
        )
        .route(
            "/payment-plans/sweep",
            post(routes::payment_plans::sweep_defaults),
        )
        .route("/payment-plans/{id}", get(routes::payment_plans::get_plan))
        .route(
            "/payment-plans/{id}/payments",
            post(routes::payment_plans::record_payment),
        )
        .route(
            "/payment-plans/{id}/cancel",
            post(routes::payment_plans::cancel_plan),
        )
        // Collections
        .route(
            "/collections",
            get(routes::collections::list_accounts).post(routes::collections::open_account),
        )
        .route(
            "/collections/refresh",
            post(routes::collections::refresh_stages),
        )
        .route("/collections/{id}", get(routes::collections::get_account))
        .route(
            "/collections/{id}/advance",
            post(routes::collections::advance_stage),
        )
        .route(
            "/collections/{id}/payments",
            post(routes::collections::record_payment),
        )
        .route(
            "/collections/{id}/write-off",
            post(routes::collections::write_off),
        )
        .route("/collections/{id}/notes", post(routes::collections::add_note))
        .route("/collections/{id}/notice", get(routes::collections::notice))
        // Scheduling
        .route(
            "/appointments",
            get(routes::appointments::list_appointments)
                .post(routes::appointments::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(routes::appointments::get_appointment)
                .put(routes::appointments::update_appointment)
                .delete(routes::appointments::delete_appointment),
        )
        // Portal
        .route(
            "/messages/{patient_id}",
            get(routes::messages::list_messages).post(routes::messages::post_message),
        )
        .route(
            "/messages/{patient_id}/read",
            post(routes::messages::mark_read),
        )
        // Settings
        .route(
            "/settings",
            get(routes::settings::get_settings).put(routes::settings::put_settings),
        )
        .route(
            "/settings/templates/{name}",
            get(routes::settings::get_template)
                .put(routes::settings::put_template)
                .delete(routes::settings::reset_template),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
