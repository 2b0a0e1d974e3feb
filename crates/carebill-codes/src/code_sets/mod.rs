pub mod cpt;
pub mod icd10;
