//! Search alert repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use refind_core::{
    CreateSearchAlertRequest, Error, ListAlertsFilter, Result, SearchAlert,
    SearchAlertRepository, UpdateSearchAlertRequest,
};

const ALERT_COLUMNS: &str = "id, owner_id, title, description, category_id, latitude, \
     longitude, radius_km, keywords, is_active, match_count, created_at_utc";

fn map_alert_row(row: &PgRow) -> SearchAlert {
    SearchAlert {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        description: row.get("description"),
        category_id: row.get("category_id"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        radius_km: row.get("radius_km"),
        keywords: row.get("keywords"),
        is_active: row.get("is_active"),
        match_count: row.get("match_count"),
        created_at_utc: row.get("created_at_utc"),
    }
}

/// PostgreSQL implementation of SearchAlertRepository.
pub struct PgSearchAlertRepository {
    pool: Pool<Postgres>,
}

impl PgSearchAlertRepository {
    /// Create a new PgSearchAlertRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchAlertRepository for PgSearchAlertRepository {
    async fn insert(&self, req: CreateSearchAlertRequest) -> Result<SearchAlert> {
        let query = format!(
            "INSERT INTO search_alert (owner_id, title, description, category_id, latitude, \
             longitude, radius_km, keywords, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            ALERT_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(req.owner_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.category_id)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(req.radius_km)
            .bind(&req.keywords)
            .bind(req.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "search_alerts",
            op = "insert",
            owner_id = %req.owner_id,
            "Inserted search alert"
        );

        Ok(map_alert_row(&row))
    }

    async fn fetch(&self, id: Uuid) -> Result<SearchAlert> {
        let query = format!("SELECT {} FROM search_alert WHERE id = $1", ALERT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::AlertNotFound(id))?;

        Ok(map_alert_row(&row))
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        filter: ListAlertsFilter,
    ) -> Result<Vec<SearchAlert>> {
        let activity_clause = match filter {
            ListAlertsFilter::All => "",
            ListAlertsFilter::Active => "AND is_active = TRUE ",
            ListAlertsFilter::Inactive => "AND is_active = FALSE ",
        };
        let query = format!(
            "SELECT {} FROM search_alert WHERE owner_id = $1 {}ORDER BY created_at_utc DESC",
            ALERT_COLUMNS, activity_clause
        );

        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(map_alert_row).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        req: UpdateSearchAlertRequest,
    ) -> Result<SearchAlert> {
        let query = format!(
            "UPDATE search_alert SET \
             title = COALESCE($3, title), \
             description = COALESCE($4, description), \
             category_id = COALESCE($5, category_id), \
             latitude = COALESCE($6, latitude), \
             longitude = COALESCE($7, longitude), \
             radius_km = COALESCE($8, radius_km), \
             keywords = COALESCE($9, keywords), \
             is_active = COALESCE($10, is_active) \
             WHERE id = $1 AND owner_id = $2 RETURNING {}",
            ALERT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(req.category_id)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(req.radius_km)
            .bind(&req.keywords)
            .bind(req.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::AlertNotFound(id))?;

        Ok(map_alert_row(&row))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM search_alert WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::AlertNotFound(id));
        }
        Ok(())
    }

    async fn set_match_count(&self, id: Uuid, count: i32) -> Result<()> {
        sqlx::query("UPDATE search_alert SET match_count = $2 WHERE id = $1")
            .bind(id)
            .bind(count)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "search_alerts",
            op = "set_match_count",
            alert_id = %id,
            result_count = count,
            "Stored alert match count"
        );
        Ok(())
    }
}
