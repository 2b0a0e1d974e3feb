use crate::CodeSet;
use crate::catalog::{CodeKind, MedicalCode, procedure};

/// CPT: Current Procedural Terminology.
/// Category I codes are five digits; Category II end in `F`, Category III in `T`.
pub struct Cpt;

impl CodeSet for Cpt {
    fn id(&self) -> &str {
        "cpt"
    }

    fn name(&self) -> &str {
        "CPT"
    }

    fn kind(&self) -> CodeKind {
        CodeKind::Procedure
    }

    fn codes(&self) -> &[MedicalCode] {
        static CODES: std::sync::LazyLock<Vec<MedicalCode>> = std::sync::LazyLock::new(|| {
            let em = "Evaluation and Management";
            let lab = "Pathology and Laboratory";
            let med = "Medicine";
            let rad = "Radiology";
            let surg = "Surgery";

            vec![
                procedure("99202", "Office visit, new patient, straightforward", em, 85.0),
                procedure("99203", "Office visit, new patient, low complexity", em, 130.0),
                procedure("99204", "Office visit, new patient, moderate complexity", em, 195.0),
                procedure("99205", "Office visit, new patient, high complexity", em, 255.0),
                procedure("99211", "Office visit, established patient, minimal", em, 30.0),
                procedure("99212", "Office visit, established patient, straightforward", em, 65.0),
                procedure("99213", "Office visit, established patient, low complexity", em, 100.0),
                procedure("99214", "Office visit, established patient, moderate complexity", em, 150.0),
                procedure("99215", "Office visit, established patient, high complexity", em, 210.0),
                procedure("99385", "Preventive visit, new patient, 18-39 years", em, 190.0),
                procedure("99395", "Preventive visit, established patient, 18-39 years", em, 170.0),
                procedure("99396", "Preventive visit, established patient, 40-64 years", em, 180.0),
                procedure("80048", "Basic metabolic panel", lab, 30.0),
                procedure("80053", "Comprehensive metabolic panel", lab, 45.0),
                procedure("80061", "Lipid panel", lab, 40.0),
                procedure("83036", "Hemoglobin A1c", lab, 25.0),
                procedure("85025", "Complete blood count with automated differential", lab, 20.0),
                procedure("81002", "Urinalysis, non-automated, without microscopy", lab, 10.0),
                procedure("87880", "Strep A antigen, rapid", lab, 25.0),
                procedure("36415", "Routine venipuncture", surg, 12.0),
                procedure("93000", "Electrocardiogram, complete", med, 55.0),
                procedure("90471", "Immunization administration, first vaccine", med, 28.0),
                procedure("90686", "Influenza vaccine, quadrivalent, preservative free", med, 35.0),
                procedure("96127", "Brief emotional/behavioral assessment", med, 18.0),
                procedure("71046", "Chest X-ray, 2 views", rad, 75.0),
                procedure("73610", "Ankle X-ray, 3 views", rad, 70.0),
                procedure("11102", "Tangential biopsy of skin, single lesion", surg, 120.0),
                procedure("17110", "Destruction of benign lesions, up to 14", surg, 115.0),
                procedure("20610", "Arthrocentesis, major joint", surg, 95.0),
                procedure("3074F", "Most recent systolic blood pressure < 130 mm Hg", med, 0.0),
            ]
        });
        &CODES
    }

    fn is_valid_format(&self, code: &str) -> bool {
        let code = code.trim();
        let bytes = code.as_bytes();
        if bytes.len() != 5 {
            return false;
        }
        let (head, last) = bytes.split_at(4);
        head.iter().all(u8::is_ascii_digit)
            && (last[0].is_ascii_digit() || matches!(last[0], b'F' | b'T' | b'f' | b't'))
    }
}
