//! Search-alert matching against the found-item stream.
//!
//! An alert matches an item when the item text mentions any alert
//! keyword (or the alert has no keywords) and the item lies inside the
//! alert's radius when both sides carry coordinates. Category filtering
//! happens upstream in the candidate query.

use tracing::debug;

use refind_core::{Item, SearchAlert};

use crate::haversine::haversine_distance_km;

/// Whether a single item satisfies an alert's keyword and radius rules.
///
/// Keyword matching is case-insensitive substring search over the item's
/// title and description. An item without coordinates is never excluded
/// by the radius rule.
pub fn alert_matches_item(alert: &SearchAlert, item: &Item) -> bool {
    keyword_match(alert, item) && radius_match(alert, item)
}

/// Count the items in a candidate pool matching an alert.
pub fn count_alert_matches(alert: &SearchAlert, items: &[Item]) -> usize {
    let count = items
        .iter()
        .filter(|item| alert_matches_item(alert, item))
        .count();

    debug!(
        subsystem = "match",
        component = "alerts",
        op = "count_matches",
        alert_id = %alert.id,
        candidate_count = items.len(),
        result_count = count,
        "Counted alert matches"
    );

    count
}

fn keyword_match(alert: &SearchAlert, item: &Item) -> bool {
    if alert.keywords.is_empty() {
        return true;
    }

    let title = item.title.to_lowercase();
    let description = item.description.to_lowercase();
    alert.keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        !keyword.is_empty() && (title.contains(&keyword) || description.contains(&keyword))
    })
}

fn radius_match(alert: &SearchAlert, item: &Item) -> bool {
    let (Some(alert_lat), Some(alert_lon)) = (alert.latitude, alert.longitude) else {
        return true;
    };
    let (Some(item_lat), Some(item_lon)) = (item.latitude, item.longitude) else {
        return true;
    };

    haversine_distance_km(alert_lat, alert_lon, item_lat, item_lon) <= alert.radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use refind_core::ItemStatus;
    use uuid::Uuid;

    fn alert() -> SearchAlert {
        SearchAlert {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "watch for my wallet".to_string(),
            description: "lost near the station".to_string(),
            category_id: None,
            latitude: None,
            longitude: None,
            radius_km: 10.0,
            keywords: Vec::new(),
            is_active: true,
            match_count: 0,
            created_at_utc: Utc::now(),
        }
    }

    fn found_item(title: &str, description: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            status: ItemStatus::Found,
            latitude: None,
            longitude: None,
            address: "central station".to_string(),
            owner_id: Uuid::new_v4(),
            category_id: None,
            created_at_utc: Utc::now(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_no_keywords_matches_everything() {
        let alert = alert();
        let item = found_item("red umbrella", "left on a bench");
        assert!(alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_keyword_in_title() {
        let mut alert = alert();
        alert.keywords = vec!["wallet".to_string()];
        let item = found_item("brown wallet", "no id inside");
        assert!(alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_keyword_in_description_case_insensitive() {
        let mut alert = alert();
        alert.keywords = vec!["Wallet".to_string()];
        let item = found_item("unknown object", "looks like a WALLET");
        assert!(alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_keyword_miss() {
        let mut alert = alert();
        alert.keywords = vec!["wallet".to_string(), "purse".to_string()];
        let item = found_item("red umbrella", "left on a bench");
        assert!(!alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_radius_excludes_distant_item() {
        let mut alert = alert();
        alert.latitude = Some(52.5200);
        alert.longitude = Some(13.4050);
        alert.radius_km = 5.0;

        let mut item = found_item("wallet", "found");
        item.latitude = Some(53.0200); // ~55 km away
        item.longitude = Some(13.4050);

        assert!(!alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_radius_keeps_close_item() {
        let mut alert = alert();
        alert.latitude = Some(52.5200);
        alert.longitude = Some(13.4050);
        alert.radius_km = 5.0;

        let mut item = found_item("wallet", "found");
        item.latitude = Some(52.5434); // ~2.6 km away
        item.longitude = Some(13.4050);

        assert!(alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_item_without_coordinates_not_excluded() {
        let mut alert = alert();
        alert.latitude = Some(52.5200);
        alert.longitude = Some(13.4050);
        alert.radius_km = 1.0;

        let item = found_item("wallet", "found");
        assert!(alert_matches_item(&alert, &item));
    }

    #[test]
    fn test_count_alert_matches() {
        let mut alert = alert();
        alert.keywords = vec!["wallet".to_string()];

        let items = vec![
            found_item("brown wallet", "found at gym"),
            found_item("red umbrella", "left on a bench"),
            found_item("keys", "with a wallet-shaped keychain"),
        ];

        assert_eq!(count_alert_matches(&alert, &items), 2);
    }
}
