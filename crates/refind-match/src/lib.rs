//! # refind-match
//!
//! Heuristic match scoring engine for the refind lost-and-found
//! marketplace.
//!
//! Given a query item and a candidate pool of opposite-status items, the
//! engine ranks candidates by an additive, explainable score built from
//! category identity, geographic proximity, description word overlap, and
//! tag overlap. Everything in this crate is a pure function over
//! already-fetched data: no I/O, no shared state, safe to call from any
//! number of concurrent requests.

pub mod alerts;
pub mod haversine;
pub mod scoring;

pub use alerts::{alert_matches_item, count_alert_matches};
pub use haversine::{haversine_distance_km, EARTH_RADIUS_KM};
pub use scoring::{score_item, score_matches, MAX_SCORE};
