use carebill_codes::catalog::CodeKind;
use carebill_codes::error::CodeError;
use carebill_codes::{CodeSet, all_code_sets, get_code_set, validate_draft_codes};
use carebill_core::models::claim::ProcedureLine;
use carebill_core::wizard::draft::ClaimDraft;

#[test]
fn registry_lists_both_code_sets() {
    let ids: Vec<String> = all_code_sets().iter().map(|s| s.id().to_string()).collect();
    assert_eq!(ids, vec!["cpt", "icd10"]);
    assert_eq!(get_code_set("icd10").unwrap().kind(), CodeKind::Diagnosis);
    assert!(get_code_set("snomed").is_none());
}

#[test]
fn every_catalog_entry_is_well_formed() {
    for set in all_code_sets() {
        for code in set.codes() {
            assert!(
                set.is_valid_format(&code.code),
                "{} catalog entry {} fails its own format check",
                set.name(),
                code.code
            );
        }
    }
}

#[test]
fn cpt_format() {
    let cpt = get_code_set("cpt").unwrap();
    assert!(cpt.is_valid_format("99213"));
    assert!(cpt.is_valid_format("3074F"));
    assert!(cpt.is_valid_format("0001T"));
    assert!(!cpt.is_valid_format("9921"));
    assert!(!cpt.is_valid_format("99213A"));
    assert!(!cpt.is_valid_format("A9921"));
}

#[test]
fn icd10_format() {
    let icd = get_code_set("icd10").unwrap();
    assert!(icd.is_valid_format("I10"));
    assert!(icd.is_valid_format("E11.9"));
    assert!(icd.is_valid_format("S93.401A"));
    assert!(!icd.is_valid_format("110"));
    assert!(!icd.is_valid_format("E11."));
    assert!(!icd.is_valid_format("E11.12345"));
}

#[test]
fn search_matches_code_and_description() {
    let cpt = get_code_set("cpt").unwrap();
    let hits = cpt.search("metabolic", 10);
    let codes: Vec<&str> = hits.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["80048", "80053"]);

    assert_eq!(cpt.search("9921", 3).len(), 3);
    assert_eq!(cpt.lookup("80053").unwrap().default_charge, Some(45.0));
}

#[test]
fn draft_code_validation_reports_each_bad_code() {
    let mut draft = ClaimDraft::default();
    draft
        .add_procedure(ProcedureLine {
            code: "99213".to_string(),
            description: String::new(),
            units: 1,
            amount: 100.0,
        })
        .unwrap();
    draft
        .add_procedure(ProcedureLine {
            code: "ABC".to_string(),
            description: String::new(),
            units: 1,
            amount: 1.0,
        })
        .unwrap();
    draft.add_diagnosis("E11.9", "");
    draft.add_diagnosis("diabetes", "");

    let errors = validate_draft_codes(&draft);
    assert_eq!(
        errors,
        vec![
            CodeError::InvalidFormat {
                code_set: "CPT".to_string(),
                code: "ABC".to_string()
            },
            CodeError::InvalidFormat {
                code_set: "ICD-10-CM".to_string(),
                code: "diabetes".to_string()
            },
        ]
    );
}
