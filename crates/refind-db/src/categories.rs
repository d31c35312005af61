//! Category repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use refind_core::{Category, CategoryRepository, CreateCategoryRequest, Error, Result};

fn map_category_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        icon_name: row.get("icon_name"),
        color_code: row.get("color_code"),
        is_active: row.get("is_active"),
        sort_order: row.get("sort_order"),
    }
}

/// PostgreSQL implementation of CategoryRepository.
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let query = if include_inactive {
            "SELECT id, name, description, icon_name, color_code, is_active, sort_order \
             FROM category ORDER BY sort_order, name"
        } else {
            "SELECT id, name, description, icon_name, color_code, is_active, sort_order \
             FROM category WHERE is_active = TRUE ORDER BY sort_order, name"
        };

        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(map_category_row).collect())
    }

    async fn insert(&self, req: CreateCategoryRequest) -> Result<Category> {
        if req.name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Category name cannot be empty".to_string(),
            ));
        }

        let row = sqlx::query(
            "INSERT INTO category (name, description, icon_name, color_code, sort_order) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, description, icon_name, color_code, is_active, sort_order",
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(&req.icon_name)
        .bind(&req.color_code)
        .bind(req.sort_order)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(map_category_row(&row))
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM category WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.get("present"))
    }
}
