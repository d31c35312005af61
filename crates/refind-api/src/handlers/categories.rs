//! Category HTTP handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use refind_core::{Category, CategoryRepository, CreateCategoryRequest};

use crate::{ApiError, AppState};

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// List categories, active only by default.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.db.categories.list(query.include_inactive).await?;
    Ok(Json(categories))
}

/// Create a new category.
///
/// # Returns
/// - 201 Created with the stored category
/// - 409 Conflict when the name is already taken
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.db.categories.insert(body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
