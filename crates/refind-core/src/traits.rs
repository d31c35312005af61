//! Core traits for refind abstractions.
//!
//! These traits define the storage interfaces that concrete
//! implementations must satisfy, enabling pluggable backends and
//! testability. The scoring engine and lifecycle validator never touch
//! storage themselves; they operate on values these repositories supply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ITEM REPOSITORY
// =============================================================================

/// Request for creating a new item.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: String,
    pub owner_id: Uuid,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
}

/// Request for listing items.
#[derive(Debug, Clone, Default)]
pub struct ListItemsRequest {
    pub status: Option<ItemStatus>,
    pub category_id: Option<Uuid>,
    /// Maximum results
    pub limit: Option<i64>,
    /// Pagination offset
    pub offset: Option<i64>,
}

/// Repository for item storage.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item with its tag associations.
    async fn insert(&self, req: CreateItemRequest) -> Result<Item>;

    /// Fetch an item by ID, tags included.
    async fn fetch(&self, id: Uuid) -> Result<Item>;

    /// List items with filtering and pagination, newest first.
    async fn list(&self, req: ListItemsRequest) -> Result<Vec<Item>>;

    /// List a user's own items, newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Item>>;

    /// Persist a new status. Callers must have validated the transition.
    async fn update_status(&self, id: Uuid, status: ItemStatus) -> Result<Item>;

    /// Candidate pool for match scoring: items in `status` owned by anyone
    /// but `exclude_owner`, optionally restricted to a category, newest
    /// first. The returned order is the stable-sort tiebreak downstream.
    async fn find_candidates(
        &self,
        status: ItemStatus,
        exclude_owner: Uuid,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Item>>;

    /// IDs of every item belonging to `owner_id`.
    async fn ids_for_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>>;
}

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Request for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub color_code: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Repository for item categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List categories ordered by sort_order then name.
    async fn list(&self, include_inactive: bool) -> Result<Vec<Category>>;

    /// Insert a new category.
    async fn insert(&self, req: CreateCategoryRequest) -> Result<Category>;

    /// Check whether a category exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tags and item-tag associations.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags ordered by usage, most used first.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Insert a tag, returning the existing row when the name is taken.
    async fn create(&self, name: &str) -> Result<Tag>;

    /// Attach tags to an item, creating missing tags on the way.
    /// Duplicate attachments are ignored; usage counts track attachments.
    async fn attach_to_item(&self, item_id: Uuid, names: &[String]) -> Result<Vec<Tag>>;

    /// Detach tags from an item.
    async fn detach_from_item(&self, item_id: Uuid, names: &[String]) -> Result<()>;

    /// Tags attached to an item.
    async fn for_item(&self, item_id: Uuid) -> Result<Vec<Tag>>;
}

// =============================================================================
// SEARCH ALERT REPOSITORY
// =============================================================================

/// Activity filter for listing search alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListAlertsFilter {
    #[default]
    All,
    Active,
    Inactive,
}

/// Request for creating a search alert.
#[derive(Debug, Clone)]
pub struct CreateSearchAlertRequest {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: f64,
    pub keywords: Vec<String>,
    pub is_active: bool,
}

/// Partial update of a search alert. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSearchAlertRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub keywords: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl UpdateSearchAlertRequest {
    /// Whether the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.radius_km.is_none()
            && self.keywords.is_none()
            && self.is_active.is_none()
    }
}

/// Repository for search alerts.
#[async_trait]
pub trait SearchAlertRepository: Send + Sync {
    /// Insert a new alert.
    async fn insert(&self, req: CreateSearchAlertRequest) -> Result<SearchAlert>;

    /// Fetch an alert by ID.
    async fn fetch(&self, id: Uuid) -> Result<SearchAlert>;

    /// List a user's alerts, newest first.
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        filter: ListAlertsFilter,
    ) -> Result<Vec<SearchAlert>>;

    /// Apply a partial update to an alert owned by `owner_id`.
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        req: UpdateSearchAlertRequest,
    ) -> Result<SearchAlert>;

    /// Delete an alert owned by `owner_id`.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()>;

    /// Store a freshly computed match count.
    async fn set_match_count(&self, id: Uuid, count: i32) -> Result<()>;
}

// =============================================================================
// ITEM MATCH REPOSITORY
// =============================================================================

/// Request for recording a manual item match.
#[derive(Debug, Clone)]
pub struct CreateItemMatchRequest {
    pub lost_item_id: Uuid,
    pub found_item_id: Uuid,
    pub confidence_score: Option<i32>,
    pub notes: Option<String>,
    pub matched_by: Uuid,
}

/// Repository for manually recorded item matches.
#[async_trait]
pub trait ItemMatchRepository: Send + Sync {
    /// Insert a new match with status `pending`.
    async fn insert(&self, req: CreateItemMatchRequest) -> Result<ItemMatch>;

    /// Fetch a match by ID.
    async fn fetch(&self, id: Uuid) -> Result<ItemMatch>;

    /// Whether a match already exists for this (lost, found) pair.
    async fn exists_pair(&self, lost_item_id: Uuid, found_item_id: Uuid) -> Result<bool>;

    /// Matches touching any of the given items, newest first.
    async fn list_for_items(
        &self,
        item_ids: &[Uuid],
        status: Option<MatchStatus>,
    ) -> Result<Vec<ItemMatch>>;

    /// Set the review status (and optionally replace the notes).
    async fn update_status(
        &self,
        id: Uuid,
        status: MatchStatus,
        notes: Option<String>,
    ) -> Result<ItemMatch>;
}
