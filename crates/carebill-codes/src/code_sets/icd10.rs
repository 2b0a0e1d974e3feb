use crate::CodeSet;
use crate::catalog::{CodeKind, MedicalCode, diagnosis};

/// ICD-10-CM diagnosis codes: letter, two alphanumerics, then optionally a dot
/// and up to four more alphanumerics (e.g. `E11.9`, `S93.401A`).
pub struct Icd10Cm;

impl CodeSet for Icd10Cm {
    fn id(&self) -> &str {
        "icd10"
    }

    fn name(&self) -> &str {
        "ICD-10-CM"
    }

    fn kind(&self) -> CodeKind {
        CodeKind::Diagnosis
    }

    fn codes(&self) -> &[MedicalCode] {
        static CODES: std::sync::LazyLock<Vec<MedicalCode>> = std::sync::LazyLock::new(|| {
            let endo = "Endocrine, nutritional and metabolic";
            let circ = "Circulatory system";
            let resp = "Respiratory system";
            let msk = "Musculoskeletal system";
            let mental = "Mental and behavioral";
            let signs = "Symptoms and signs";
            let factors = "Factors influencing health status";
            let injury = "Injury";

            vec![
                diagnosis("E11.9", "Type 2 diabetes mellitus without complications", endo),
                diagnosis("E11.65", "Type 2 diabetes mellitus with hyperglycemia", endo),
                diagnosis("E78.5", "Hyperlipidemia, unspecified", endo),
                diagnosis("E66.9", "Obesity, unspecified", endo),
                diagnosis("E03.9", "Hypothyroidism, unspecified", endo),
                diagnosis("I10", "Essential (primary) hypertension", circ),
                diagnosis("I25.10", "Atherosclerotic heart disease of native coronary artery", circ),
                diagnosis("I48.91", "Unspecified atrial fibrillation", circ),
                diagnosis("J06.9", "Acute upper respiratory infection, unspecified", resp),
                diagnosis("J02.9", "Acute pharyngitis, unspecified", resp),
                diagnosis("J45.909", "Unspecified asthma, uncomplicated", resp),
                diagnosis("J44.9", "Chronic obstructive pulmonary disease, unspecified", resp),
                diagnosis("M54.50", "Low back pain, unspecified", msk),
                diagnosis("M25.561", "Pain in right knee", msk),
                diagnosis("M17.11", "Unilateral primary osteoarthritis, right knee", msk),
                diagnosis("F41.1", "Generalized anxiety disorder", mental),
                diagnosis("F32.9", "Major depressive disorder, single episode, unspecified", mental),
                diagnosis("F90.0", "ADHD, predominantly inattentive type", mental),
                diagnosis("R05.9", "Cough, unspecified", signs),
                diagnosis("R51.9", "Headache, unspecified", signs),
                diagnosis("R10.9", "Unspecified abdominal pain", signs),
                diagnosis("R53.83", "Other fatigue", signs),
                diagnosis("Z00.00", "General adult medical exam without abnormal findings", factors),
                diagnosis("Z23", "Encounter for immunization", factors),
                diagnosis("Z13.31", "Encounter for screening for depression", factors),
                diagnosis("S93.401A", "Sprain of unspecified ligament of right ankle, initial encounter", injury),
            ]
        });
        &CODES
    }

    fn is_valid_format(&self, code: &str) -> bool {
        let code = code.trim();
        let (category, subcategory) = match code.split_once('.') {
            Some((c, s)) => (c, Some(s)),
            None => (code, None),
        };

        let cat = category.as_bytes();
        let category_ok = cat.len() == 3
            && cat[0].is_ascii_alphabetic()
            && cat[1].is_ascii_digit()
            && cat[2].is_ascii_alphanumeric();

        let subcategory_ok = match subcategory {
            None => true,
            Some(s) => (1..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()),
        };

        category_ok && subcategory_ok
    }
}
