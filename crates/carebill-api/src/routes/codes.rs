use axum::Json;
use axum::extract::{Path, Query};
use serde::{Deserialize, Serialize};

use carebill_codes::catalog::{CodeKind, MedicalCode};
use carebill_codes::error::CodeError;
use carebill_codes::{all_code_sets, get_code_set};

use crate::error::ApiError;

const DEFAULT_LIMIT: usize = 25;

#[derive(Serialize)]
pub struct CodeSetSummary {
    id: String,
    name: String,
    kind: CodeKind,
    count: usize,
}

pub async fn list_code_sets() -> Json<Vec<CodeSetSummary>> {
    let sets = all_code_sets()
        .iter()
        .map(|s| CodeSetSummary {
            id: s.id().to_string(),
            name: s.name().to_string(),
            kind: s.kind(),
            count: s.codes().len(),
        })
        .collect();
    Json(sets)
}

#[derive(Debug, Default, Deserialize)]
pub struct CodeQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Picker search for the services and diagnosis steps. A blank query lists
/// the start of the catalog.
pub async fn search_codes(
    Path(set): Path<String>,
    Query(query): Query<CodeQuery>,
) -> Result<Json<Vec<MedicalCode>>, ApiError> {
    let code_set = get_code_set(&set).ok_or_else(|| CodeError::UnknownCodeSet(set.clone()))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100);
    let hits = code_set
        .search(query.q.as_deref().unwrap_or(""), limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(hits))
}

#[derive(Serialize)]
pub struct CodeLookup {
    code: String,
    valid_format: bool,
    entry: Option<MedicalCode>,
}

/// Whether `code` is well-formed for the set, plus its catalog entry if curated.
pub async fn lookup_code(
    Path((set, code)): Path<(String, String)>,
) -> Result<Json<CodeLookup>, ApiError> {
    let code_set = get_code_set(&set).ok_or_else(|| CodeError::UnknownCodeSet(set.clone()))?;
    Ok(Json(CodeLookup {
        valid_format: code_set.is_valid_format(&code),
        entry: code_set.lookup(&code).cloned(),
        code,
    }))
}
