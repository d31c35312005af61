//! # refind-db
//!
//! PostgreSQL database layer for refind.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - Embedded schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use refind_core::{CreateItemRequest, ItemRepository, ItemStatus};
//! use refind_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/refind").await?;
//!
//!     let item = db.items.insert(CreateItemRequest {
//!         title: "Black wallet".to_string(),
//!         description: "Leather, two card slots".to_string(),
//!         status: ItemStatus::Lost,
//!         latitude: None,
//!         longitude: None,
//!         address: "Central station".to_string(),
//!         owner_id: uuid::Uuid::new_v4(),
//!         category_id: None,
//!         tags: vec!["brown".to_string()],
//!     }).await?;
//!
//!     println!("Created item: {}", item.id);
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod item_matches;
pub mod items;
pub mod pool;
pub mod search_alerts;
pub mod tags;

// Re-export core types
pub use refind_core::*;

// Re-export repository implementations
pub use categories::PgCategoryRepository;
pub use item_matches::{PgItemMatchRepository, DEFAULT_CONFIDENCE_SCORE};
pub use items::{PgItemRepository, DEFAULT_LIST_LIMIT};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use search_alerts::PgSearchAlertRepository;
pub use tags::{validate_tag_name, PgTagRepository};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Item repository.
    pub items: PgItemRepository,
    /// Category repository.
    pub categories: PgCategoryRepository,
    /// Tag repository.
    pub tags: PgTagRepository,
    /// Search alert repository.
    pub search_alerts: PgSearchAlertRepository,
    /// Item match repository.
    pub item_matches: PgItemMatchRepository,
}

impl Database {
    /// Create a Database from an existing connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            items: PgItemRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            search_alerts: PgSearchAlertRepository::new(pool.clone()),
            item_matches: PgItemMatchRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
