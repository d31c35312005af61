//! Core data models for refind.
//!
//! These types are shared across all refind crates and represent the
//! core domain entities of the lost-and-found marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// =============================================================================
// ITEM TYPES
// =============================================================================

/// Lifecycle stage of a reported item.
///
/// An item starts as `lost` (or `found` when a finder reports it first),
/// moves to `found` once recovered, and ends at `returned`. `returned` is
/// terminal. The reachable-state table lives in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Item is reported as lost and needs to be found
    Lost,
    /// Item has been found and is waiting to be returned
    Found,
    /// Item has been successfully returned to owner
    Returned,
}

impl ItemStatus {
    /// Stable string form, matching the database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
            Self::Returned => "returned",
        }
    }

    /// The status a candidate match must carry for an item in this status.
    ///
    /// Lost items match against found items and vice versa. A returned
    /// query item falls back to the lost pool.
    pub fn opposite(&self) -> ItemStatus {
        match self {
            Self::Lost => Self::Found,
            _ => Self::Lost,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            "returned" => Ok(Self::Returned),
            other => Err(format!(
                "Invalid status '{}'. Must be one of: lost, found, returned",
                other
            )),
        }
    }
}

/// A reported lost or found item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    /// Decimal degrees; present together with `longitude` or not at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub address: String,
    /// Reporting user; matching excludes candidates from the same owner.
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub created_at_utc: DateTime<Utc>,
    /// Associated tag names (order irrelevant).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Transition table and status glossary returned by the status-info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub available_statuses: Vec<ItemStatus>,
    pub status_transitions: BTreeMap<String, Vec<ItemStatus>>,
    pub status_descriptions: BTreeMap<String, String>,
}

// =============================================================================
// MATCH TYPES
// =============================================================================

/// A scored candidate produced by the match scoring engine.
///
/// Derived, never persisted: the candidate item plus a heuristic score in
/// [0, 100], higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    pub item: Item,
    pub score: u32,
}

/// Review state of a manually recorded item match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Rejected,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            other => Err(format!(
                "Invalid status '{}'. Must be: pending, confirmed, rejected, completed",
                other
            )),
        }
    }
}

/// A manually recorded pairing of a lost item with a found item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMatch {
    pub id: Uuid,
    pub lost_item_id: Uuid,
    pub found_item_id: Uuid,
    pub confidence_score: i32,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// User who recorded the match (owner of one of the two items).
    pub matched_by: Uuid,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// SEARCH ALERT TYPES
// =============================================================================

/// A standing search watching the found-item stream for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAlert {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub radius_km: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub is_active: bool,
    /// Number of found items currently matching this alert.
    pub match_count: i32,
    pub created_at_utc: DateTime<Utc>,
}

// =============================================================================
// CATEGORY AND TAG TYPES
// =============================================================================

/// Item category (wallets, keys, electronics, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Free-form descriptive tag attached to items via a many-to-many join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub usage_count: i32,
    pub created_at_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_item_status_roundtrip() {
        for s in ["lost", "found", "returned"] {
            let status = ItemStatus::from_str(s).unwrap();
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn test_item_status_from_str_case_insensitive() {
        assert_eq!(ItemStatus::from_str("LOST").unwrap(), ItemStatus::Lost);
        assert_eq!(ItemStatus::from_str("Found").unwrap(), ItemStatus::Found);
    }

    #[test]
    fn test_item_status_from_str_invalid() {
        let err = ItemStatus::from_str("stolen").unwrap_err();
        assert!(err.contains("stolen"));
        assert!(err.contains("lost, found, returned"));
    }

    #[test]
    fn test_item_status_serde_lowercase() {
        let json = serde_json::to_string(&ItemStatus::Returned).unwrap();
        assert_eq!(json, "\"returned\"");
        let back: ItemStatus = serde_json::from_str("\"lost\"").unwrap();
        assert_eq!(back, ItemStatus::Lost);
    }

    #[test]
    fn test_opposite_status() {
        assert_eq!(ItemStatus::Lost.opposite(), ItemStatus::Found);
        assert_eq!(ItemStatus::Found.opposite(), ItemStatus::Lost);
        assert_eq!(ItemStatus::Returned.opposite(), ItemStatus::Lost);
    }

    #[test]
    fn test_match_status_roundtrip() {
        for s in ["pending", "confirmed", "rejected", "completed"] {
            assert_eq!(MatchStatus::from_str(s).unwrap().as_str(), s);
        }
        assert!(MatchStatus::from_str("archived").is_err());
    }
}
