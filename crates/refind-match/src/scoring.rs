//! Additive heuristic scoring of candidate matches.
//!
//! Each scoring rule contributes an independent weighted signal; the sum
//! is clamped to [`MAX_SCORE`]. The engine is deterministic: identical
//! inputs always yield identical scores and ordering, and equal scores
//! keep the candidate pool's order (stable sort).

use std::collections::HashSet;

use tracing::debug;

use refind_core::{Item, RankedMatch};

use crate::haversine::haversine_distance_km;

/// Upper bound on a match score.
pub const MAX_SCORE: u32 = 100;

/// Points for an exact category match.
const CATEGORY_POINTS: u32 = 30;

/// Proximity tiers: (distance upper bound in km, points).
const PROXIMITY_TIERS: [(f64, u32); 3] = [(1.0, 25), (5.0, 15), (10.0, 10)];

/// Points per common description word.
const WORD_POINTS: u32 = 2;

/// Cap on the description-overlap component.
const WORD_OVERLAP_CAP: u32 = 20;

/// Points per common tag. The tag component itself is uncapped; the
/// final clamp bounds the total.
const TAG_POINTS: u32 = 5;

/// Score one candidate against the query item.
///
/// Missing optional fields on either side degrade the corresponding
/// component to zero; this never fails.
pub fn score_item(query: &Item, candidate: &Item) -> u32 {
    let total = category_score(query, candidate)
        + proximity_score(query, candidate)
        + word_overlap_score(&query.description, &candidate.description)
        + tag_overlap_score(&query.tags, &candidate.tags);

    total.min(MAX_SCORE)
}

/// Rank a candidate pool against a query item.
///
/// Candidates are expected to already carry the opposite status and to
/// exclude the query item's owner; the engine only scores and sorts.
/// Output is descending by score, ties keeping pool order.
pub fn score_matches(query: &Item, candidates: Vec<Item>) -> Vec<RankedMatch> {
    let candidate_count = candidates.len();

    let mut ranked: Vec<RankedMatch> = candidates
        .into_iter()
        .map(|item| {
            let score = score_item(query, &item);
            RankedMatch { item, score }
        })
        .collect();

    // Vec::sort_by is stable, which is what keeps equal-score candidates
    // in pool order.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    debug!(
        subsystem = "match",
        component = "scoring",
        op = "score_matches",
        item_id = %query.id,
        candidate_count,
        result_count = ranked.len(),
        "Scored candidate pool"
    );

    ranked
}

/// +30 when both items carry the same category.
fn category_score(query: &Item, candidate: &Item) -> u32 {
    match (query.category_id, candidate.category_id) {
        (Some(a), Some(b)) if a == b => CATEGORY_POINTS,
        _ => 0,
    }
}

/// Tiered proximity bonus, computed only when both items have coordinates.
fn proximity_score(query: &Item, candidate: &Item) -> u32 {
    let (Some(lat1), Some(lon1)) = (query.latitude, query.longitude) else {
        return 0;
    };
    let (Some(lat2), Some(lon2)) = (candidate.latitude, candidate.longitude) else {
        return 0;
    };

    let distance = haversine_distance_km(lat1, lon1, lat2, lon2);
    for (bound, points) in PROXIMITY_TIERS {
        if distance < bound {
            return points;
        }
    }
    0
}

/// 2 points per query-side word found anywhere in the candidate
/// description, capped at 20.
///
/// Query-side duplicates count once per occurrence (a repeated word in
/// the query description scores repeatedly when the candidate contains
/// it). That mirrors the platform's historical scoring and inflates
/// repetitive descriptions; tests document the behavior.
fn word_overlap_score(query_desc: &str, candidate_desc: &str) -> u32 {
    let candidate_lower = candidate_desc.to_lowercase();
    let candidate_words: HashSet<&str> = candidate_lower.split_whitespace().collect();
    if candidate_words.is_empty() {
        return 0;
    }

    let query_lower = query_desc.to_lowercase();
    let common = query_lower
        .split_whitespace()
        .filter(|word| candidate_words.contains(word))
        .count() as u32;

    (common * WORD_POINTS).min(WORD_OVERLAP_CAP)
}

/// 5 points per tag name present in both tag sets.
fn tag_overlap_score(query_tags: &[String], candidate_tags: &[String]) -> u32 {
    if query_tags.is_empty() || candidate_tags.is_empty() {
        return 0;
    }

    let candidate_set: HashSet<&str> = candidate_tags.iter().map(String::as_str).collect();
    let common = query_tags
        .iter()
        .filter(|tag| candidate_set.contains(tag.as_str()))
        .count() as u32;

    common * TAG_POINTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use refind_core::ItemStatus;
    use uuid::Uuid;

    fn item(status: ItemStatus) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "test item".to_string(),
            description: String::new(),
            status,
            latitude: None,
            longitude: None,
            address: "somewhere".to_string(),
            owner_id: Uuid::new_v4(),
            category_id: None,
            created_at_utc: Utc::now(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_category_match_scores_30() {
        let category = Uuid::new_v4();
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.category_id = Some(category);
        candidate.category_id = Some(category);

        assert_eq!(score_item(&query, &candidate), 30);
    }

    #[test]
    fn test_category_mismatch_scores_0() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.category_id = Some(Uuid::new_v4());
        candidate.category_id = Some(Uuid::new_v4());

        assert_eq!(score_item(&query, &candidate), 0);
    }

    #[test]
    fn test_missing_category_on_either_side_scores_0() {
        let mut query = item(ItemStatus::Lost);
        let candidate = item(ItemStatus::Found);
        query.category_id = Some(Uuid::new_v4());

        assert_eq!(score_item(&query, &candidate), 0);
        assert_eq!(score_item(&candidate, &query), 0);
    }

    #[test]
    fn test_identical_coordinates_hit_nearest_tier() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.latitude = Some(59.3293);
        query.longitude = Some(18.0686);
        candidate.latitude = Some(59.3293);
        candidate.longitude = Some(18.0686);

        assert_eq!(score_item(&query, &candidate), 25);
    }

    #[test]
    fn test_proximity_tiers() {
        let mut query = item(ItemStatus::Lost);
        query.latitude = Some(52.5200);
        query.longitude = Some(13.4050);

        // ~2.6 km north of the query point
        let mut near = item(ItemStatus::Found);
        near.latitude = Some(52.5434);
        near.longitude = Some(13.4050);
        assert_eq!(score_item(&query, &near), 15);

        // ~7.8 km north
        let mut area = item(ItemStatus::Found);
        area.latitude = Some(52.5900);
        area.longitude = Some(13.4050);
        assert_eq!(score_item(&query, &area), 10);

        // ~55 km north: outside every tier
        let mut far = item(ItemStatus::Found);
        far.latitude = Some(53.0200);
        far.longitude = Some(13.4050);
        assert_eq!(score_item(&query, &far), 0);
    }

    #[test]
    fn test_missing_coordinates_contribute_zero() {
        let mut query = item(ItemStatus::Lost);
        query.latitude = Some(52.5200);
        query.longitude = Some(13.4050);
        let candidate = item(ItemStatus::Found);

        assert_eq!(score_item(&query, &candidate), 0);
        assert_eq!(score_item(&candidate, &query), 0);
    }

    #[test]
    fn test_word_overlap_scoring() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.description = "black leather wallet".to_string();
        candidate.description = "found a leather wallet near the gym".to_string();

        // "leather" and "wallet" overlap: 2 words * 2 points
        assert_eq!(score_item(&query, &candidate), 4);
    }

    #[test]
    fn test_word_overlap_is_case_insensitive() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.description = "Black LEATHER Wallet".to_string();
        candidate.description = "leather wallet".to_string();

        assert_eq!(score_item(&query, &candidate), 4);
    }

    #[test]
    fn test_word_overlap_caps_at_20() {
        let words: Vec<String> = (0..15).map(|i| format!("word{}", i)).collect();
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.description = words.join(" ");
        candidate.description = words.join(" ");

        // 15 common words would be 30 points uncapped
        assert_eq!(score_item(&query, &candidate), 20);
    }

    #[test]
    fn test_repeated_query_words_count_per_occurrence() {
        // Historical behavior: query-side duplicates are not deduplicated,
        // so repetitive descriptions inflate the component.
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.description = "wallet wallet wallet".to_string();
        candidate.description = "brown wallet".to_string();

        assert_eq!(score_item(&query, &candidate), 6);
    }

    #[test]
    fn test_empty_description_contributes_zero() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        candidate.description = "leather wallet".to_string();
        query.description = String::new();

        assert_eq!(score_item(&query, &candidate), 0);
    }

    #[test]
    fn test_tag_overlap_scoring() {
        let mut query = item(ItemStatus::Lost);
        let mut candidate = item(ItemStatus::Found);
        query.tags = vec!["brown".to_string(), "small".to_string()];
        candidate.tags = vec!["brown".to_string()];

        assert_eq!(score_item(&query, &candidate), 5);
    }

    #[test]
    fn test_missing_tags_contribute_zero() {
        let mut query = item(ItemStatus::Lost);
        query.tags = vec!["brown".to_string()];
        let candidate = item(ItemStatus::Found);

        assert_eq!(score_item(&query, &candidate), 0);
    }

    #[test]
    fn test_end_to_end_example_scores_39() {
        let category = Uuid::new_v4();

        let mut query = item(ItemStatus::Lost);
        query.category_id = Some(category);
        query.description = "black leather wallet".to_string();
        query.tags = vec!["brown".to_string(), "small".to_string()];

        let mut candidate = item(ItemStatus::Found);
        candidate.category_id = Some(category);
        candidate.description = "found a leather wallet near the gym".to_string();
        candidate.tags = vec!["brown".to_string()];

        // category 30 + words 4 + tags 5
        assert_eq!(score_item(&query, &candidate), 39);
    }

    #[test]
    fn test_score_clamped_at_100() {
        let category = Uuid::new_v4();
        let words: Vec<String> = (0..10).map(|i| format!("word{}", i)).collect();
        let tags: Vec<String> = (0..6).map(|i| format!("tag{}", i)).collect();

        let mut query = item(ItemStatus::Lost);
        query.category_id = Some(category);
        query.latitude = Some(52.5200);
        query.longitude = Some(13.4050);
        query.description = words.join(" ");
        query.tags = tags.clone();

        let mut candidate = item(ItemStatus::Found);
        candidate.category_id = Some(category);
        candidate.latitude = Some(52.5200);
        candidate.longitude = Some(13.4050);
        candidate.description = words.join(" ");
        candidate.tags = tags;

        // Raw sum: 30 + 25 + 20 + 30 = 105
        assert_eq!(score_item(&query, &candidate), 100);
    }

    #[test]
    fn test_score_matches_sorted_descending() {
        let category = Uuid::new_v4();
        let mut query = item(ItemStatus::Lost);
        query.category_id = Some(category);
        query.description = "black leather wallet".to_string();

        let weak = item(ItemStatus::Found);
        let mut strong = item(ItemStatus::Found);
        strong.category_id = Some(category);
        strong.description = "leather wallet".to_string();

        let ranked = score_matches(&query, vec![weak.clone(), strong.clone()]);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].item.id, strong.id);
        assert_eq!(ranked[1].item.id, weak.id);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_equal_scores_keep_pool_order() {
        let query = item(ItemStatus::Lost);
        let a = item(ItemStatus::Found);
        let b = item(ItemStatus::Found);
        let c = item(ItemStatus::Found);
        let ids: Vec<Uuid> = vec![a.id, b.id, c.id];

        let ranked = score_matches(&query, vec![a, b, c]);

        let ranked_ids: Vec<Uuid> = ranked.iter().map(|m| m.item.id).collect();
        assert_eq!(ranked_ids, ids);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let category = Uuid::new_v4();
        let mut query = item(ItemStatus::Lost);
        query.category_id = Some(category);
        query.description = "blue backpack with laptop".to_string();
        query.tags = vec!["blue".to_string()];

        let mut c1 = item(ItemStatus::Found);
        c1.category_id = Some(category);
        c1.description = "backpack found on bus".to_string();
        let mut c2 = item(ItemStatus::Found);
        c2.tags = vec!["blue".to_string()];

        let first = score_matches(&query, vec![c1.clone(), c2.clone()]);
        let second = score_matches(&query, vec![c1, c2]);

        let first_view: Vec<(Uuid, u32)> = first.iter().map(|m| (m.item.id, m.score)).collect();
        let second_view: Vec<(Uuid, u32)> = second.iter().map(|m| (m.item.id, m.score)).collect();
        assert_eq!(first_view, second_view);
    }

    #[test]
    fn test_empty_candidate_pool() {
        let query = item(ItemStatus::Lost);
        assert!(score_matches(&query, Vec::new()).is_empty());
    }
}
