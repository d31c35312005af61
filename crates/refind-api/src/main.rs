//! refind-api - HTTP API server for the refind lost-and-found marketplace

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use refind_db::{log_pool_metrics, Database};

use handlers::{
    categories::{create_category, list_categories},
    items::{
        create_item, get_item, list_items, my_items, status_info, update_item_status,
    },
    search::{
        create_item_match, create_search_alert, delete_search_alert, get_item_matches,
        list_search_alerts, list_user_matches, update_match_status, update_search_alert,
    },
    tags::{add_item_tags, create_tag, get_item_tags, list_tags, remove_item_tags},
};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Arc<Database>,
}

/// Caller identity supplied by the upstream authorization layer.
///
/// The API trusts this value as-is; resolving and verifying identity is
/// out of scope for this service.
#[derive(Debug, Deserialize)]
struct CallerQuery {
    user_id: Uuid,
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Database(refind_core::Error),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<refind_core::Error> for ApiError {
    fn from(err: refind_core::Error) -> Self {
        match &err {
            refind_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            refind_core::Error::ItemNotFound(id) => {
                ApiError::NotFound(format!("Item not found: {}", id))
            }
            refind_core::Error::AlertNotFound(id) => {
                ApiError::NotFound(format!("Search alert not found: {}", id))
            }
            refind_core::Error::MatchNotFound(id) => {
                ApiError::NotFound(format!("Item match not found: {}", id))
            }
            refind_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            refind_core::Error::Transition(e) => ApiError::BadRequest(e.to_string()),
            refind_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    // Provide user-friendly error messages for known constraints
                    let friendly_msg = if msg.contains("item_match") {
                        "Match already exists for these items".to_string()
                    } else if msg.contains("category_name_key") || msg.contains("category") {
                        "A category with this name already exists".to_string()
                    } else if msg.contains("tag_name_key") || msg.contains("tag") {
                        "A tag with this name already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                if msg.contains("foreign key") {
                    return ApiError::BadRequest(msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// CORS
// =============================================================================

fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    if origins_str.trim().is_empty() {
        // Default origins
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// HEALTH
// =============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match sqlx::query("SELECT 1").execute(state.db.pool()).await {
        Ok(_) => "reachable",
        Err(_) => "unreachable",
    };

    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "refind_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "refind_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("refind-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/refind".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");
    log_pool_metrics(db.pool());

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Create app state
    let state = AppState { db: Arc::new(db) };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Items
        .route("/api/v1/items", get(list_items).post(create_item))
        .route("/api/v1/items/mine", get(my_items))
        .route("/api/v1/items/status-info", get(status_info))
        .route("/api/v1/items/:id", get(get_item))
        .route("/api/v1/items/:id/status", patch(update_item_status))
        .route(
            "/api/v1/items/:id/tags",
            get(get_item_tags)
                .post(add_item_tags)
                .delete(remove_item_tags),
        )
        // Categories
        .route(
            "/api/v1/categories",
            get(list_categories).post(create_category),
        )
        // Tags
        .route("/api/v1/tags", get(list_tags).post(create_tag))
        // Scored matches
        .route("/api/v1/search/matches/item/:item_id", get(get_item_matches))
        // Recorded matches
        .route(
            "/api/v1/search/matches",
            get(list_user_matches).post(create_item_match),
        )
        .route(
            "/api/v1/search/matches/:match_id/status",
            put(update_match_status),
        )
        // Search alerts
        .route(
            "/api/v1/search/alerts",
            get(list_search_alerts).post(create_search_alert),
        )
        .route(
            "/api/v1/search/alerts/:alert_id",
            put(update_search_alert).delete(delete_search_alert),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        })
        .layer(RequestBodyLimitLayer::new(1024 * 1024)) // 1 MB
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections");
}
