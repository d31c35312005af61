//! Matching and search-alert HTTP handlers.
//!
//! The scored-match endpoint is the main consumer of the scoring engine:
//! it loads the query item, pulls an opposite-status candidate pool from
//! storage, and hands both to `refind_match` for ranking.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use refind_core::{
    CreateItemMatchRequest, CreateSearchAlertRequest, Item, ItemMatch, ItemMatchRepository,
    ItemRepository, ListAlertsFilter, ListItemsRequest, MatchStatus, RankedMatch, SearchAlert,
    SearchAlertRepository, UpdateSearchAlertRequest,
};
use refind_match::{count_alert_matches, score_matches};

use crate::{ApiError, AppState, CallerQuery};

/// Candidate pool size when the client does not ask for more.
const DEFAULT_MATCH_LIMIT: i64 = 10;

/// Found items inspected per alert recount.
const ALERT_SCAN_LIMIT: i64 = 10;

// =============================================================================
// SCORED MATCHES
// =============================================================================

/// Query parameters for the scored-match endpoint.
#[derive(Debug, Deserialize)]
pub struct ItemMatchesQuery {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

/// Response for the scored-match endpoint.
#[derive(Debug, Serialize)]
pub struct ItemMatchesResponse {
    pub item: Item,
    pub matches: Vec<RankedMatch>,
}

/// Rank opposite-status candidates against one of the caller's items.
///
/// # Returns
/// - 200 OK with the query item and its ranked matches
/// - 404 Not Found when the item doesn't exist or belongs to someone else
pub async fn get_item_matches(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<ItemMatchesQuery>,
) -> Result<Json<ItemMatchesResponse>, ApiError> {
    let item = state.db.items.fetch(item_id).await?;
    if item.owner_id != query.user_id {
        return Err(ApiError::NotFound(
            "Item not found or you don't have access".to_string(),
        ));
    }

    let candidates = state
        .db
        .items
        .find_candidates(
            item.status.opposite(),
            query.user_id,
            item.category_id,
            query.limit.unwrap_or(DEFAULT_MATCH_LIMIT),
        )
        .await?;

    let matches = score_matches(&item, candidates);

    info!(
        subsystem = "api",
        component = "search",
        op = "item_matches",
        item_id = %item_id,
        result_count = matches.len(),
        "Ranked candidate matches"
    );

    Ok(Json(ItemMatchesResponse { item, matches }))
}

// =============================================================================
// RECORDED MATCHES
// =============================================================================

/// Request body for recording a manual match.
#[derive(Debug, Deserialize)]
pub struct CreateMatchBody {
    pub lost_item_id: Uuid,
    pub found_item_id: Uuid,
    pub confidence_score: Option<i32>,
    pub notes: Option<String>,
    pub user_id: Uuid,
}

/// Record a manual match between a lost item and a found item.
///
/// The caller must own one of the two items; a (lost, found) pair can
/// only be recorded once.
pub async fn create_item_match(
    State(state): State<AppState>,
    Json(body): Json<CreateMatchBody>,
) -> Result<(StatusCode, Json<ItemMatch>), ApiError> {
    let lost = state.db.items.fetch(body.lost_item_id).await?;
    let found = state.db.items.fetch(body.found_item_id).await?;

    if lost.owner_id != body.user_id && found.owner_id != body.user_id {
        return Err(ApiError::Forbidden(
            "You must own one of the items to create a match".to_string(),
        ));
    }

    if state
        .db
        .item_matches
        .exists_pair(body.lost_item_id, body.found_item_id)
        .await?
    {
        return Err(ApiError::BadRequest(
            "Match already exists for these items".to_string(),
        ));
    }

    let created = state
        .db
        .item_matches
        .insert(CreateItemMatchRequest {
            lost_item_id: body.lost_item_id,
            found_item_id: body.found_item_id,
            confidence_score: body.confidence_score,
            notes: body.notes,
            matched_by: body.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Query parameters for listing recorded matches.
#[derive(Debug, Deserialize)]
pub struct ListMatchesQuery {
    pub user_id: Uuid,
    pub status: Option<String>,
}

/// List every recorded match touching one of the caller's items.
pub async fn list_user_matches(
    State(state): State<AppState>,
    Query(query): Query<ListMatchesQuery>,
) -> Result<Json<Vec<ItemMatch>>, ApiError> {
    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(MatchStatus::from_str(raw).map_err(ApiError::BadRequest)?),
    };

    let item_ids = state.db.items.ids_for_owner(query.user_id).await?;
    let matches = state.db.item_matches.list_for_items(&item_ids, status).await?;

    Ok(Json(matches))
}

/// Request body for updating a recorded match's review status.
#[derive(Debug, Deserialize)]
pub struct UpdateMatchStatusBody {
    pub status: String,
    pub notes: Option<String>,
    pub user_id: Uuid,
}

/// Set the review status of a recorded match.
pub async fn update_match_status(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
    Json(body): Json<UpdateMatchStatusBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = MatchStatus::from_str(&body.status).map_err(ApiError::BadRequest)?;

    let existing = state.db.item_matches.fetch(match_id).await?;
    let lost = state.db.items.fetch(existing.lost_item_id).await?;
    let found = state.db.items.fetch(existing.found_item_id).await?;

    if lost.owner_id != body.user_id && found.owner_id != body.user_id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this match".to_string(),
        ));
    }

    let updated = state
        .db
        .item_matches
        .update_status(match_id, status, body.notes)
        .await?;

    Ok(Json(serde_json::json!({
        "message": format!("Match status updated to {}", status),
        "match": updated,
    })))
}

// =============================================================================
// SEARCH ALERTS
// =============================================================================

/// Request body for creating a search alert.
#[derive(Debug, Deserialize)]
pub struct CreateAlertBody {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub is_active: Option<bool>,
}

/// Create a search alert and compute its initial match count.
pub async fn create_search_alert(
    State(state): State<AppState>,
    Json(body): Json<CreateAlertBody>,
) -> Result<(StatusCode, Json<SearchAlert>), ApiError> {
    if body.title.trim().is_empty() || body.description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let alert = state
        .db
        .search_alerts
        .insert(CreateSearchAlertRequest {
            owner_id: body.user_id,
            title: body.title.trim().to_string(),
            description: body.description,
            category_id: body.category_id,
            latitude: body.latitude,
            longitude: body.longitude,
            radius_km: body.radius_km.unwrap_or(10.0),
            keywords: body.keywords,
            is_active: body.is_active.unwrap_or(true),
        })
        .await?;

    refresh_alert_matches(&state, alert.id).await?;
    let alert = state.db.search_alerts.fetch(alert.id).await?;

    Ok((StatusCode::CREATED, Json(alert)))
}

/// Query parameters for listing search alerts.
#[derive(Debug, Deserialize)]
pub struct ListAlertsQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub status: ListAlertsFilter,
}

/// List the caller's search alerts.
pub async fn list_search_alerts(
    State(state): State<AppState>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<Json<Vec<SearchAlert>>, ApiError> {
    let alerts = state
        .db
        .search_alerts
        .list_for_owner(query.user_id, query.status)
        .await?;
    Ok(Json(alerts))
}

/// Apply a partial update to a search alert, recounting matches when the
/// alert is reactivated or materially changed.
pub async fn update_search_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Query(caller): Query<CallerQuery>,
    Json(body): Json<UpdateSearchAlertRequest>,
) -> Result<Json<SearchAlert>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest(
            "No valid fields provided for update".to_string(),
        ));
    }

    let reactivated = body.is_active == Some(true);
    let field_count = [
        body.title.is_some(),
        body.description.is_some(),
        body.category_id.is_some(),
        body.latitude.is_some(),
        body.longitude.is_some(),
        body.radius_km.is_some(),
        body.keywords.is_some(),
        body.is_active.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();

    let alert = state
        .db
        .search_alerts
        .update(alert_id, caller.user_id, body)
        .await?;

    if reactivated || field_count > 1 {
        refresh_alert_matches(&state, alert_id).await?;
    }

    let alert = state.db.search_alerts.fetch(alert.id).await?;
    Ok(Json(alert))
}

/// Delete a search alert.
pub async fn delete_search_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Query(caller): Query<CallerQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .search_alerts
        .delete(alert_id, caller.user_id)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Search alert deleted successfully",
    })))
}

/// Recompute and store an alert's match count against the current
/// found-item stream. Inactive alerts keep their last stored count.
async fn refresh_alert_matches(state: &AppState, alert_id: Uuid) -> Result<(), ApiError> {
    let alert = state.db.search_alerts.fetch(alert_id).await?;
    if !alert.is_active {
        return Ok(());
    }

    let found_items = state
        .db
        .items
        .list(ListItemsRequest {
            status: Some(refind_core::ItemStatus::Found),
            category_id: alert.category_id,
            limit: Some(ALERT_SCAN_LIMIT),
            offset: None,
        })
        .await?;

    let count = count_alert_matches(&alert, &found_items);
    state
        .db
        .search_alerts
        .set_match_count(alert_id, count as i32)
        .await?;

    Ok(())
}
