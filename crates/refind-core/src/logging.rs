//! Structured logging schema and field name constants for refind.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized field
//! names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (candidates, scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request's sub-calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "match"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "scoring", "alerts", "pool", "items"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "score_matches", "update_status", "recount"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Item UUID being operated on.
pub const ITEM_ID: &str = "item_id";

/// Search alert UUID being operated on.
pub const ALERT_ID: &str = "alert_id";

/// Item match UUID being operated on.
pub const MATCH_ID: &str = "match_id";

/// Owner/user UUID on whose behalf the operation runs.
pub const OWNER_ID: &str = "owner_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query or scoring pass.
pub const RESULT_COUNT: &str = "result_count";

/// Number of candidates fed into the scoring engine.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Heuristic match score (0-100).
pub const SCORE: &str = "score";

// ─── Lifecycle fields ──────────────────────────────────────────────────────

/// Status an item is transitioning from.
pub const STATUS_FROM: &str = "status_from";

/// Status an item is transitioning to.
pub const STATUS_TO: &str = "status_to";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
