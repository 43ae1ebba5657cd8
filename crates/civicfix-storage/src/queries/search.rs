//! Filtered and vector-ranked search over issues and fixes.
//!
//! One execution path per document family. Hard filters (status, time,
//! geo bounding box, strict categories) run in SQL with the stored vectors
//! joined in; the exact haversine radius, category boost, and cosine
//! ranking run here. Candidates without a comparable vector are still
//! returned, after every ranked one.

use std::cmp::Ordering;

use rusqlite::types::Value;
use rusqlite::Connection;

use civicfix_core::constants::EARTH_RADIUS_M;
use civicfix_core::errors::CivicResult;
use civicfix_core::models::{
    CategoryFilter, CategoryMode, FixQuery, FixRecord, GeoFilter, GeoPoint, Issue, IssueQuery,
};

use super::fix_crud::select_fixes_with_embeddings;
use super::issue_crud::select_issues_with_embeddings;
use super::{cosine_similarity, ts};

const UNSCORED: f64 = f64::NEG_INFINITY;

/// Latitude/longitude box enclosing a circle. `None` for the longitude
/// range when the box would wrap the antimeridian or cover a pole.
pub(crate) struct BoundingBox {
    pub lat: (f64, f64),
    pub lon: Option<(f64, f64)>,
}

pub(crate) fn bounding_box(center: GeoPoint, radius_m: f64) -> BoundingBox {
    let dlat = (radius_m / EARTH_RADIUS_M).to_degrees();
    let lat = (center.lat - dlat, center.lat + dlat);

    let cos_lat = center.lat.to_radians().cos();
    let lon = if lat.0 <= -90.0 || lat.1 >= 90.0 || cos_lat <= f64::EPSILON {
        None
    } else {
        let dlon = dlat / cos_lat;
        let range = (center.lon - dlon, center.lon + dlon);
        (range.0 >= -180.0 && range.1 <= 180.0).then_some(range)
    };
    BoundingBox { lat, lon }
}

/// Append bounding-box predicates for `geo` to `clauses`.
pub(crate) fn push_geo_clauses(geo: &GeoFilter, clauses: &mut Vec<String>, values: &mut Vec<Value>) {
    let bbox = bounding_box(geo.center, geo.radius_m);
    clauses.push("lat BETWEEN ? AND ?".into());
    values.push(Value::Real(bbox.lat.0));
    values.push(Value::Real(bbox.lat.1));
    if let Some((west, east)) = bbox.lon {
        clauses.push("lon BETWEEN ? AND ?".into());
        values.push(Value::Real(west));
        values.push(Value::Real(east));
    }
}

/// Append an `EXISTS` over the JSON label array in `column` when `filter`
/// is a non-empty strict category constraint. Boost mode never filters.
fn push_category_clause(
    filter: Option<&CategoryFilter>,
    column: &str,
    clauses: &mut Vec<String>,
    values: &mut Vec<Value>,
) {
    let Some(filter) = filter else {
        return;
    };
    if filter.mode != CategoryMode::Strict || filter.labels.is_empty() {
        return;
    }
    let marks = vec!["?"; filter.labels.len()].join(", ");
    clauses.push(format!(
        "EXISTS (SELECT 1 FROM json_each({column}) WHERE json_each.value IN ({marks}))"
    ));
    values.extend(filter.labels.iter().cloned().map(Value::Text));
}

fn category_boost(filter: Option<&CategoryFilter>, types: &[String]) -> bool {
    match filter {
        Some(f) if f.mode == CategoryMode::Boost => types.iter().any(|t| f.labels.contains(t)),
        _ => false,
    }
}

fn where_tail(clauses: &[String]) -> String {
    if clauses.is_empty() {
        "ORDER BY created_at DESC".to_string()
    } else {
        format!("WHERE {} ORDER BY created_at DESC", clauses.join(" AND "))
    }
}

/// Similarity of a candidate's stored vector to the query. Candidates with
/// no stored vector, or one of another dimensionality, score below every
/// comparable candidate but stay in the results.
fn similarity(query: Option<&[f32]>, stored: Option<&[f32]>) -> f64 {
    match (query, stored) {
        (None, _) => 0.0,
        (Some(q), Some(s)) if q.len() == s.len() => cosine_similarity(q, s),
        (Some(_), _) => UNSCORED,
    }
}

/// Rank by similarity, then boosted category, then whatever order the
/// candidates arrived in (newest first).
fn rank<T>(mut scored: Vec<(T, f64, bool)>, limit: usize) -> Vec<T> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.2.cmp(&a.2))
    });
    scored.into_iter().take(limit).map(|(doc, _, _)| doc).collect()
}

pub fn search_issues(conn: &Connection, query: &IssueQuery) -> CivicResult<Vec<Issue>> {
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let categories = query.categories.as_ref();
    let mut clauses = vec!["status != 'spam'".to_string()];
    let mut values = Vec::new();
    if let Some(after) = &query.created_after {
        clauses.push("created_at >= ?".into());
        values.push(Value::Text(ts(after)));
    }
    if let Some(geo) = &query.geo {
        push_geo_clauses(geo, &mut clauses, &mut values);
    }
    push_category_clause(categories, "issues.issue_types", &mut clauses, &mut values);

    let vector = query.vector.as_deref();
    let scored = select_issues_with_embeddings(conn, &where_tail(&clauses), values)?
        .into_iter()
        .filter(|issue| {
            query
                .geo
                .as_ref()
                .map_or(true, |g| g.center.distance_m(&issue.location) <= g.radius_m)
        })
        .map(|mut issue| {
            let stored = issue.text_embedding.take();
            let sim = similarity(vector, stored.as_deref());
            let boosted = category_boost(categories, &issue.issue_types);
            (issue, sim, boosted)
        })
        .collect();
    Ok(rank(scored, query.limit))
}

pub fn search_fixes(conn: &Connection, query: &FixQuery) -> CivicResult<Vec<FixRecord>> {
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let categories = query.categories.as_ref();
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    push_category_clause(
        categories,
        "fixes.related_issue_types",
        &mut clauses,
        &mut values,
    );

    let vector = query.vector.as_deref();
    let scored = select_fixes_with_embeddings(conn, &where_tail(&clauses), values)?
        .into_iter()
        .map(|mut fix| {
            let stored = fix.text_embedding.take();
            let sim = similarity(vector, stored.as_deref());
            let boosted = category_boost(categories, &fix.related_issue_types);
            (fix, sim, boosted)
        })
        .collect();
    Ok(rank(scored, query.limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_contains_radius() {
        let center = GeoPoint { lat: 28.6139, lon: 77.2090 };
        let bbox = bounding_box(center, 500.0);
        let north = GeoPoint { lat: bbox.lat.1, lon: center.lon };
        assert!((center.distance_m(&north) - 500.0).abs() < 1.0);
        let (west, east) = bbox.lon.unwrap();
        assert!(west < center.lon && center.lon < east);
    }

    #[test]
    fn bounding_box_drops_longitude_near_antimeridian() {
        let bbox = bounding_box(GeoPoint { lat: 0.0, lon: 179.999 }, 5_000.0);
        assert!(bbox.lon.is_none());
    }

    #[test]
    fn rank_orders_by_similarity_then_boost() {
        let ranked = rank(vec![("a", 0.5, false), ("b", 0.9, false), ("c", 0.5, true)], 3);
        assert_eq!(ranked, vec!["b", "c", "a"]);
        let unranked = rank(vec![("new", 0.0, false), ("old", 0.0, true)], 1);
        assert_eq!(unranked, vec!["old"]);
        let mixed = rank(
            vec![("plain", UNSCORED, true), ("far", -0.4, false), ("near", 0.7, false)],
            3,
        );
        assert_eq!(mixed, vec!["near", "far", "plain"]);
    }

    #[test]
    fn similarity_marks_incomparable_vectors_unscored() {
        let q = [1.0f32, 0.0];
        assert_eq!(similarity(None, Some(&[1.0, 0.0])), 0.0);
        assert!((similarity(Some(&q), Some(&[1.0, 0.0])) - 1.0).abs() < 1e-9);
        assert_eq!(similarity(Some(&q), None), UNSCORED);
        assert_eq!(similarity(Some(&q), Some(&[1.0, 0.0, 0.0])), UNSCORED);
    }
}
