//! Item HTTP handlers: reporting, listing, and the status lifecycle.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use refind_core::{
    allowed_next_statuses, status_description, validate_status_transition_str, CategoryRepository,
    CreateItemRequest, Item, ItemRepository, ItemStatus, ListItemsRequest, StatusInfo,
    VALID_STATUSES,
};

use crate::{ApiError, AppState, CallerQuery};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

/// Request body for reporting an item.
#[derive(Debug, Deserialize)]
pub struct CreateItemBody {
    pub title: String,
    pub description: String,
    /// Initial status; defaults to "lost" when omitted.
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub owner_id: Uuid,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Report a new lost or found item.
///
/// # Returns
/// - 201 Created with the stored item
/// - 400 Bad Request on missing fields, bad status, or bad coordinates
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<CreateItemBody>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let address = body.address.unwrap_or_default();
    if body.title.trim().is_empty() || body.description.trim().is_empty() || address.trim().is_empty()
    {
        return Err(ApiError::BadRequest(
            "Title, description, and location are required".to_string(),
        ));
    }

    let status = match body.status.as_deref() {
        None | Some("") => ItemStatus::Lost,
        Some(raw) => ItemStatus::from_str(raw).map_err(ApiError::BadRequest)?,
    };

    validate_coordinates(body.latitude, body.longitude)?;

    if let Some(category_id) = body.category_id {
        if !state.db.categories.exists(category_id).await? {
            return Err(ApiError::BadRequest("Invalid category".to_string()));
        }
    }

    let item = state
        .db
        .items
        .insert(CreateItemRequest {
            title: body.title.trim().to_string(),
            description: body.description,
            status,
            latitude: body.latitude,
            longitude: body.longitude,
            address,
            owner_id: body.owner_id,
            category_id: body.category_id,
            tags: body.tags,
        })
        .await?;

    info!(
        subsystem = "api",
        component = "items",
        op = "create",
        item_id = %item.id,
        owner_id = %item.owner_id,
        "Item reported"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// List items with optional status/category filters, newest first.
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let status = parse_optional_status(query.status.as_deref())?;

    let items = state
        .db
        .items
        .list(ListItemsRequest {
            status,
            category_id: query.category_id,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(Json(items))
}

/// Get a single item by ID.
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Item>, ApiError> {
    let item = state.db.items.fetch(item_id).await?;
    Ok(Json(item))
}

/// List the calling user's own items.
pub async fn my_items(
    State(state): State<AppState>,
    Query(caller): Query<CallerQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.db.items.list_for_owner(caller.user_id).await?;
    Ok(Json(items))
}

/// Move an item along its status lifecycle.
///
/// The transition is validated against the lifecycle table before
/// anything is persisted: unknown statuses, no-op changes, and
/// unreachable targets are all rejected as client errors.
pub async fn update_item_status(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.status.trim().is_empty() {
        return Err(ApiError::BadRequest("Status is required".to_string()));
    }

    let item = state.db.items.fetch(item_id).await?;
    let target = validate_status_transition_str(item.status, &body.status)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let updated = state.db.items.update_status(item_id, target).await?;

    info!(
        subsystem = "api",
        component = "items",
        op = "update_status",
        item_id = %item_id,
        status_from = item.status.as_str(),
        status_to = target.as_str(),
        "Item status changed"
    );

    Ok(Json(serde_json::json!({
        "message": format!("Item status updated to '{}' successfully", target),
        "item": updated,
    })))
}

/// Expose the status domain and transition table to clients.
pub async fn status_info() -> Json<StatusInfo> {
    let mut status_transitions = BTreeMap::new();
    let mut status_descriptions = BTreeMap::new();
    for status in VALID_STATUSES {
        status_transitions.insert(status.to_string(), allowed_next_statuses(status).to_vec());
        status_descriptions.insert(status.to_string(), status_description(status).to_string());
    }

    Json(StatusInfo {
        available_statuses: VALID_STATUSES.to_vec(),
        status_transitions,
        status_descriptions,
    })
}

// =============================================================================
// VALIDATION HELPERS
// =============================================================================

pub(crate) fn parse_optional_status(raw: Option<&str>) -> Result<Option<ItemStatus>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => ItemStatus::from_str(raw)
            .map(Some)
            .map_err(ApiError::BadRequest),
    }
}

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), ApiError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ApiError::BadRequest(
                    "Latitude must be between -90 and 90".to_string(),
                ));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::BadRequest(
                    "Longitude must be between -180 and 180".to_string(),
                ));
            }
            Ok(())
        }
        _ => Err(ApiError::BadRequest(
            "Latitude and longitude must be provided together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates_both_or_neither() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(52.52), Some(13.4)).is_ok());
        assert!(validate_coordinates(Some(52.52), None).is_err());
        assert!(validate_coordinates(None, Some(13.4)).is_err());
    }

    #[test]
    fn test_validate_coordinates_ranges() {
        assert!(validate_coordinates(Some(91.0), Some(0.0)).is_err());
        assert!(validate_coordinates(Some(-91.0), Some(0.0)).is_err());
        assert!(validate_coordinates(Some(0.0), Some(181.0)).is_err());
        assert!(validate_coordinates(Some(0.0), Some(-181.0)).is_err());
        assert!(validate_coordinates(Some(90.0), Some(180.0)).is_ok());
    }

    #[test]
    fn test_parse_optional_status() {
        assert_eq!(parse_optional_status(None).unwrap(), None);
        assert_eq!(parse_optional_status(Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_status(Some("found")).unwrap(),
            Some(ItemStatus::Found)
        );
        assert!(parse_optional_status(Some("stolen")).is_err());
    }
}
