//! Tag HTTP handlers: the tag catalog and item-tag associations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use refind_core::{ItemRepository, Tag, TagRepository};

use crate::{ApiError, AppState};

/// Request body for creating a tag.
#[derive(Debug, Deserialize)]
pub struct CreateTagBody {
    pub name: String,
}

/// Request body for attaching or detaching item tags.
#[derive(Debug, Deserialize)]
pub struct ItemTagsBody {
    pub tags: Vec<String>,
}

/// List all tags, most used first.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.db.tags.list().await?;
    Ok(Json(tags))
}

/// Create a tag (idempotent on name).
pub async fn create_tag(
    State(state): State<AppState>,
    Json(body): Json<CreateTagBody>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let tag = state.db.tags.create(body.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// List the tags attached to an item.
pub async fn get_item_tags(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    // Surface a 404 for unknown items rather than an empty list
    state.db.items.fetch(item_id).await?;
    let tags = state.db.tags.for_item(item_id).await?;
    Ok(Json(tags))
}

/// Attach tags to an item, creating missing tags on the way.
pub async fn add_item_tags(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<ItemTagsBody>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    if body.tags.is_empty() {
        return Err(ApiError::BadRequest("No tags provided".to_string()));
    }

    state.db.items.fetch(item_id).await?;
    let tags = state.db.tags.attach_to_item(item_id, &body.tags).await?;
    Ok(Json(tags))
}

/// Detach tags from an item.
pub async fn remove_item_tags(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<ItemTagsBody>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    if body.tags.is_empty() {
        return Err(ApiError::BadRequest("No tags provided".to_string()));
    }

    state.db.items.fetch(item_id).await?;
    state.db.tags.detach_from_item(item_id, &body.tags).await?;
    let tags = state.db.tags.for_item(item_id).await?;
    Ok(Json(tags))
}
