//! Item match repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use refind_core::{
    CreateItemMatchRequest, Error, ItemMatch, ItemMatchRepository, MatchStatus, Result,
};

/// Confidence assigned when the caller does not supply one.
pub const DEFAULT_CONFIDENCE_SCORE: i32 = 75;

const MATCH_COLUMNS: &str = "id, lost_item_id, found_item_id, confidence_score, status, notes, \
     matched_by, created_at_utc";

fn map_match_row(row: &PgRow) -> Result<ItemMatch> {
    let status: String = row.get("status");
    let status: MatchStatus = status.parse().map_err(Error::Internal)?;

    Ok(ItemMatch {
        id: row.get("id"),
        lost_item_id: row.get("lost_item_id"),
        found_item_id: row.get("found_item_id"),
        confidence_score: row.get("confidence_score"),
        status,
        notes: row.get("notes"),
        matched_by: row.get("matched_by"),
        created_at_utc: row.get("created_at_utc"),
    })
}

/// PostgreSQL implementation of ItemMatchRepository.
pub struct PgItemMatchRepository {
    pool: Pool<Postgres>,
}

impl PgItemMatchRepository {
    /// Create a new PgItemMatchRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemMatchRepository for PgItemMatchRepository {
    async fn insert(&self, req: CreateItemMatchRequest) -> Result<ItemMatch> {
        let query = format!(
            "INSERT INTO item_match (lost_item_id, found_item_id, confidence_score, status, \
             notes, matched_by) \
             VALUES ($1, $2, $3, 'pending', $4, $5) RETURNING {}",
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(req.lost_item_id)
            .bind(req.found_item_id)
            .bind(req.confidence_score.unwrap_or(DEFAULT_CONFIDENCE_SCORE))
            .bind(&req.notes)
            .bind(req.matched_by)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "item_matches",
            op = "insert",
            item_id = %req.lost_item_id,
            owner_id = %req.matched_by,
            "Recorded item match"
        );

        map_match_row(&row)
    }

    async fn fetch(&self, id: Uuid) -> Result<ItemMatch> {
        let query = format!("SELECT {} FROM item_match WHERE id = $1", MATCH_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::MatchNotFound(id))?;

        map_match_row(&row)
    }

    async fn exists_pair(&self, lost_item_id: Uuid, found_item_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM item_match \
             WHERE lost_item_id = $1 AND found_item_id = $2) AS present",
        )
        .bind(lost_item_id)
        .bind(found_item_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.get("present"))
    }

    async fn list_for_items(
        &self,
        item_ids: &[Uuid],
        status: Option<MatchStatus>,
    ) -> Result<Vec<ItemMatch>> {
        let query = format!(
            "SELECT {} FROM item_match \
             WHERE (lost_item_id = ANY($1) OR found_item_id = ANY($1)) \
             AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at_utc DESC",
            MATCH_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(item_ids)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        rows.iter().map(map_match_row).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: MatchStatus,
        notes: Option<String>,
    ) -> Result<ItemMatch> {
        let query = format!(
            "UPDATE item_match SET status = $2, notes = COALESCE($3, notes) \
             WHERE id = $1 RETURNING {}",
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(&notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::MatchNotFound(id))?;

        debug!(
            subsystem = "db",
            component = "item_matches",
            op = "update_status",
            match_id = %id,
            status_to = status.as_str(),
            "Updated match status"
        );

        map_match_row(&row)
    }
}
