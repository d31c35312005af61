//! Item repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use refind_core::{
    CreateItemRequest, Error, Item, ItemRepository, ItemStatus, ListItemsRequest, Result,
};

use crate::tags::attach_tags_tx;

/// Default page size for item listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Shared SELECT head: an item row with its tag names aggregated in.
const ITEM_SELECT: &str = "SELECT i.id, i.title, i.description, i.status, i.latitude, \
     i.longitude, i.address, i.owner_id, i.category_id, i.created_at_utc, \
     COALESCE((SELECT array_agg(t.name ORDER BY t.name) \
               FROM item_tag it JOIN tag t ON t.id = it.tag_id \
               WHERE it.item_id = i.id), ARRAY[]::varchar[]) AS tags \
     FROM item i ";

/// PostgreSQL implementation of ItemRepository.
pub struct PgItemRepository {
    pool: Pool<Postgres>,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_item_row(row: &PgRow) -> Result<Item> {
    let status: String = row.get("status");
    let status: ItemStatus = status.parse().map_err(Error::Internal)?;

    Ok(Item {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status,
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        address: row.get("address"),
        owner_id: row.get("owner_id"),
        category_id: row.get("category_id"),
        created_at_utc: row.get("created_at_utc"),
        tags: row.get("tags"),
    })
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn insert(&self, req: CreateItemRequest) -> Result<Item> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let id: Uuid = sqlx::query(
            "INSERT INTO item (title, description, status, latitude, longitude, address, \
             owner_id, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status.as_str())
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.address)
        .bind(req.owner_id)
        .bind(req.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?
        .get("id");

        if !req.tags.is_empty() {
            attach_tags_tx(&mut tx, id, &req.tags).await?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "items",
            op = "insert",
            item_id = %id,
            owner_id = %req.owner_id,
            "Inserted item"
        );

        self.fetch(id).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        let query = format!("{} WHERE i.id = $1", ITEM_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::ItemNotFound(id))?;

        map_item_row(&row)
    }

    async fn list(&self, req: ListItemsRequest) -> Result<Vec<Item>> {
        let mut query = format!("{} WHERE 1=1 ", ITEM_SELECT);
        let mut param_idx = 1;

        if req.status.is_some() {
            query.push_str(&format!("AND i.status = ${} ", param_idx));
            param_idx += 1;
        }
        if req.category_id.is_some() {
            query.push_str(&format!("AND i.category_id = ${} ", param_idx));
            param_idx += 1;
        }
        query.push_str(&format!(
            "ORDER BY i.created_at_utc DESC LIMIT ${} OFFSET ${}",
            param_idx,
            param_idx + 1
        ));

        let mut q = sqlx::query(&query);
        if let Some(status) = req.status {
            q = q.bind(status.as_str());
        }
        if let Some(category_id) = req.category_id {
            q = q.bind(category_id);
        }
        q = q
            .bind(req.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .bind(req.offset.unwrap_or(0));

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        rows.iter().map(map_item_row).collect()
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Item>> {
        let query = format!(
            "{} WHERE i.owner_id = $1 ORDER BY i.created_at_utc DESC",
            ITEM_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(map_item_row).collect()
    }

    async fn update_status(&self, id: Uuid, status: ItemStatus) -> Result<Item> {
        let result = sqlx::query("UPDATE item SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id));
        }

        debug!(
            subsystem = "db",
            component = "items",
            op = "update_status",
            item_id = %id,
            status_to = status.as_str(),
            "Persisted item status"
        );

        self.fetch(id).await
    }

    async fn find_candidates(
        &self,
        status: ItemStatus,
        exclude_owner: Uuid,
        category_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Item>> {
        // When the query item has no category, only categorized candidates
        // are considered (matching the platform's historical behavior).
        let category_clause = match category_id {
            Some(_) => "AND i.category_id = $3 ",
            None => "AND i.category_id IS NOT NULL ",
        };
        let query = format!(
            "{} WHERE i.status = $1 AND i.owner_id <> $2 {}\
             ORDER BY i.created_at_utc DESC LIMIT {}",
            ITEM_SELECT,
            category_clause,
            if category_id.is_some() { "$4" } else { "$3" },
        );

        let mut q = sqlx::query(&query).bind(status.as_str()).bind(exclude_owner);
        if let Some(category_id) = category_id {
            q = q.bind(category_id);
        }
        q = q.bind(limit);

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        rows.iter().map(map_item_row).collect()
    }

    async fn ids_for_owner(&self, owner_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT id FROM item WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }
}
