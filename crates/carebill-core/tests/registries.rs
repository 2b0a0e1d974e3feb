use jiff::civil::datetime;
use uuid::Uuid;

use carebill_core::error::CoreError;
use carebill_core::models::Record;
use carebill_core::models::address::Address;
use carebill_core::models::appointment::{Appointment, AppointmentStatus};
use carebill_core::models::eligibility::{self, CoverageStatus, EligibilityCheck};
use carebill_core::models::patient::Patient;
use carebill_core::models::provider::Provider;
use carebill_core::search;

fn patient(first: &str, last: &str) -> Patient {
    serde_json::from_value(serde_json::json!({
        "first_name": first,
        "last_name": last,
        "date_of_birth": "1980-04-12",
    }))
    .unwrap()
}

fn provider(npi: &str) -> Provider {
    serde_json::from_value(serde_json::json!({
        "first_name": "Ana",
        "last_name": "Lopez",
        "npi": npi,
        "specialty": "Family Medicine",
    }))
    .unwrap()
}

#[test]
fn omitted_identity_fields_are_defaulted() {
    let p = patient("Jane", "Doe");
    assert!(p.active);
    assert_eq!(p.balance, 0.0);
    assert_eq!(p.address, Address::default());
}

#[test]
fn patient_requires_names() {
    let p = patient("  ", "Doe");
    assert!(matches!(p.validate(), Err(CoreError::MissingField(f)) if f == "first_name"));
    assert!(patient("Jane", "Doe").validate().is_ok());
}

#[test]
fn partial_address_must_be_complete() {
    let mut p = patient("Jane", "Doe");
    p.address.line1 = "12 Elm St".to_string();
    assert!(p.validate().is_err());
    p.address.city = "Springfield".to_string();
    p.address.state = "IL".to_string();
    p.address.zip = "62704-1234".to_string();
    assert!(p.validate().is_ok());
    assert_eq!(p.address.one_line(), "12 Elm St, Springfield, IL 62704-1234");
}

#[test]
fn provider_npi_must_be_ten_digits() {
    assert!(provider("1234567890").validate().is_ok());
    assert!(matches!(
        provider("12345").validate(),
        Err(CoreError::InvalidField { field, .. }) if field == "npi"
    ));
}

#[test]
fn provider_npi_may_be_blank_or_absent() {
    let blank = provider("");
    assert!(blank.validate().is_ok());
    assert_eq!(blank.to_ref().npi, None);

    let absent: Provider = serde_json::from_value(serde_json::json!({
        "first_name": "Ben",
        "last_name": "Ng",
    }))
    .unwrap();
    assert_eq!(absent.npi, None);
    assert!(absent.validate().is_ok());
    assert_eq!(absent.to_ref().name, "Ben Ng");

    assert_eq!(
        provider("1234567890").to_ref().npi.as_deref(),
        Some("1234567890")
    );
}

#[test]
fn stamping_preserves_creation_time_on_update() {
    let mut p = patient("Jane", "Doe");
    let created: jiff::Timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
    let later: jiff::Timestamp = "2024-06-01T00:00:00Z".parse().unwrap();
    let id = Uuid::new_v4();
    p.stamp_existing(id, created, later);
    assert_eq!(p.id(), id);
    assert_eq!(p.created_at, created);
    assert_eq!(p.updated_at, later);
    assert_eq!(Patient::key(id), format!("patients/{id}.json"));
}

#[test]
fn search_matches_any_field_case_insensitively() {
    let mut jane = patient("Jane", "Doe");
    jane.member_id = Some("XZ991".to_string());
    let patients = vec![jane, patient("John", "Smith"), patient("Janet", "Ng")];

    let hits = search::filter(patients.clone(), Some("jan"));
    assert_eq!(hits.len(), 2);

    let hits = search::filter(patients.clone(), Some("xz99"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].last_name, "Doe");

    let hits = search::filter(patients.clone(), Some("jane doe"));
    assert_eq!(hits.len(), 1);

    assert_eq!(search::filter(patients.clone(), Some("   ")).len(), 3);
    assert_eq!(search::filter(patients, None).len(), 3);
}

fn appointment(provider_id: Uuid, hour: i8, minutes: u32) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        provider_id,
        facility_id: None,
        start: datetime(2025, 5, 5, hour, 0, 0, 0),
        duration_minutes: minutes,
        kind: None,
        status: AppointmentStatus::Scheduled,
        notes: None,
        created_at: jiff::Timestamp::UNIX_EPOCH,
        updated_at: jiff::Timestamp::UNIX_EPOCH,
    }
}

#[test]
fn overlapping_appointments_conflict_for_same_provider() {
    let provider = Uuid::new_v4();
    let existing = vec![appointment(provider, 9, 60)];

    let clash = appointment(provider, 9, 30);
    assert!(clash.find_conflict(&existing).is_some());

    let back_to_back = appointment(provider, 10, 30);
    assert!(back_to_back.find_conflict(&existing).is_none());

    let other_provider = appointment(Uuid::new_v4(), 9, 30);
    assert!(other_provider.find_conflict(&existing).is_none());
}

#[test]
fn cancelled_appointments_free_the_slot() {
    let provider = Uuid::new_v4();
    let mut cancelled = appointment(provider, 9, 60);
    cancelled.status = AppointmentStatus::Cancelled;
    let existing = vec![cancelled];
    assert!(appointment(provider, 9, 30).find_conflict(&existing).is_none());
}

#[test]
fn latest_eligibility_check_wins() {
    let check = |at: &str, met: f64| EligibilityCheck {
        id: Uuid::new_v4(),
        patient_id: Uuid::nil(),
        payer_id: Uuid::nil(),
        member_id: "M1".to_string(),
        coverage_status: CoverageStatus::Active,
        plan_name: None,
        copay: Some(25.0),
        deductible: 1500.0,
        deductible_met: met,
        out_of_pocket_max: None,
        checked_at: at.parse().unwrap(),
    };
    let checks = vec![
        check("2025-01-02T00:00:00Z", 100.0),
        check("2025-03-02T00:00:00Z", 1600.0),
    ];
    let latest = eligibility::latest(&checks).unwrap();
    assert_eq!(latest.deductible_met, 1600.0);
    assert_eq!(latest.remaining_deductible(), 0.0);
    assert_eq!(checks[0].remaining_deductible(), 1400.0);
}
