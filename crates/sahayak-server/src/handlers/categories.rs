//! Category listing and detail handlers
//!
//! Path segments resolve through `Category` parsing only (exact names, with
//! `_`/`-` accepted as separators). Free-text matching is the classifier's
//! job; these endpoints do not do near-name guessing.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState};
use sahayak_core::models::{Category, SchemeRecord};

/// GET /api/categories - All category names, in registration order
pub async fn list_categories(State(_state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(Category::ALL.iter().map(|c| c.to_string()).collect())
}

/// Category detail: scheme facts plus current alerts
#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    pub category: Category,
    #[serde(flatten)]
    pub record: SchemeRecord,
}

/// GET /api/categories/:name - Scheme facts for one category
///
/// A known category with no knowledge-base entry answers with empty fields
/// rather than an error.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<CategoryDetail>, AppError> {
    let category: Category = name
        .parse()
        .map_err(|_| AppError::not_found(&format!("Unknown category: {}", name)))?;

    let record = state.kb.get(category).cloned().unwrap_or_default();

    Ok(Json(CategoryDetail { category, record }))
}
