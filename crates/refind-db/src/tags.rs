//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use refind_core::{Error, Result, Tag, TagRepository};

/// Validate a tag name.
///
/// Rules:
/// - Length between 1-50 characters
/// - Allowed characters: alphanumeric, hyphens (-), underscores (_), spaces
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag_name(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if tag.len() > 50 {
        return Err("Tag name must be 50 characters or less".to_string());
    }

    let invalid_chars: Vec<char> = tag
        .chars()
        .filter(|c| !c.is_alphanumeric() && *c != '-' && *c != '_' && *c != ' ')
        .collect();

    if !invalid_chars.is_empty() {
        let chars_display: String = invalid_chars
            .iter()
            .take(5)
            .map(|c| format!("'{}'", c))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(format!(
            "Tag contains invalid characters: {}. Only alphanumeric characters, hyphens, underscores, and spaces are allowed",
            chars_display
        ));
    }

    Ok(())
}

fn map_tag_row(row: &PgRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        usage_count: row.get("usage_count"),
        created_at_utc: row.get("created_at_utc"),
    }
}

/// Attach tags to an item inside an existing transaction, creating
/// missing tags and bumping usage counts for new attachments only.
pub(crate) async fn attach_tags_tx(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    names: &[String],
) -> Result<Vec<Tag>> {
    for name in names {
        validate_tag_name(name).map_err(Error::InvalidInput)?;

        sqlx::query("INSERT INTO tag (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        let attached = sqlx::query(
            "INSERT INTO item_tag (item_id, tag_id) \
             SELECT $1, t.id FROM tag t WHERE t.name = $2 \
             ON CONFLICT DO NOTHING",
        )
        .bind(item_id)
        .bind(name)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if attached.rows_affected() > 0 {
            sqlx::query("UPDATE tag SET usage_count = usage_count + 1 WHERE name = $1")
                .bind(name)
                .execute(&mut **tx)
                .await
                .map_err(Error::Database)?;
        }
    }

    let rows = sqlx::query(
        "SELECT t.id, t.name, t.usage_count, t.created_at_utc \
         FROM tag t JOIN item_tag it ON it.tag_id = t.id \
         WHERE it.item_id = $1 ORDER BY t.name",
    )
    .bind(item_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(Error::Database)?;

    Ok(rows.iter().map(map_tag_row).collect())
}

/// PostgreSQL implementation of TagRepository.
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT id, name, usage_count, created_at_utc FROM tag \
             ORDER BY usage_count DESC, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(map_tag_row).collect())
    }

    async fn create(&self, name: &str) -> Result<Tag> {
        validate_tag_name(name).map_err(Error::InvalidInput)?;

        sqlx::query("INSERT INTO tag (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        let row = sqlx::query("SELECT id, name, usage_count, created_at_utc FROM tag WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(map_tag_row(&row))
    }

    async fn attach_to_item(&self, item_id: Uuid, names: &[String]) -> Result<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let tags = attach_tags_tx(&mut tx, item_id, names).await?;
        tx.commit().await.map_err(Error::Database)?;
        Ok(tags)
    }

    async fn detach_from_item(&self, item_id: Uuid, names: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for name in names {
            let detached = sqlx::query(
                "DELETE FROM item_tag USING tag \
                 WHERE item_tag.tag_id = tag.id AND item_tag.item_id = $1 \
                 AND LOWER(tag.name) = LOWER($2)",
            )
            .bind(item_id)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

            if detached.rows_affected() > 0 {
                sqlx::query(
                    "UPDATE tag SET usage_count = GREATEST(usage_count - 1, 0) \
                     WHERE LOWER(name) = LOWER($1)",
                )
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
            }
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn for_item(&self, item_id: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            "SELECT t.id, t.name, t.usage_count, t.created_at_utc \
             FROM tag t JOIN item_tag it ON it.tag_id = t.id \
             WHERE it.item_id = $1 ORDER BY t.name",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(map_tag_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tag_name_accepts_reasonable_names() {
        assert!(validate_tag_name("brown").is_ok());
        assert!(validate_tag_name("water-resistant").is_ok());
        assert!(validate_tag_name("size_12").is_ok());
        assert!(validate_tag_name("dark blue").is_ok());
    }

    #[test]
    fn test_validate_tag_name_rejects_empty() {
        assert!(validate_tag_name("").is_err());
    }

    #[test]
    fn test_validate_tag_name_rejects_too_long() {
        let long = "a".repeat(51);
        assert!(validate_tag_name(&long).is_err());
    }

    #[test]
    fn test_validate_tag_name_rejects_special_characters() {
        let err = validate_tag_name("wallet!").unwrap_err();
        assert!(err.contains("'!'"));
    }
}
