//! Paged geo listing: non-spam issues around a point, nearest first.

use std::cmp::Ordering;

use rusqlite::Connection;

use civicfix_core::errors::{CivicResult, ValidationError};
use civicfix_core::models::{GeoFilter, GeoPoint, NearbyIssue, NearbyPage, PageRequest};

use super::issue_crud::select_issues;
use super::search::push_geo_clauses;

pub fn list_issues_near(
    conn: &Connection,
    center: GeoPoint,
    radius_m: f64,
    page: PageRequest,
) -> CivicResult<NearbyPage> {
    center.validate()?;
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ValidationError::InvalidRadius {
            radius_km: radius_m / 1000.0,
        }
        .into());
    }
    if page.page_size == 0 {
        return Err(ValidationError::InvalidPage {
            reason: "page_size must be positive".into(),
        }
        .into());
    }

    let mut clauses = vec!["status != 'spam'".to_string()];
    let mut values = Vec::new();
    push_geo_clauses(&GeoFilter { center, radius_m }, &mut clauses, &mut values);
    let tail = format!("WHERE {}", clauses.join(" AND "));

    let mut nearby: Vec<NearbyIssue> = select_issues(conn, &tail, values)?
        .into_iter()
        .filter_map(|issue| {
            let distance_m = center.distance_m(&issue.location);
            (distance_m <= radius_m).then_some(NearbyIssue { issue, distance_m })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_m
            .partial_cmp(&b.distance_m)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.issue
                    .impact_score
                    .partial_cmp(&a.issue.impact_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.issue.issue_id.cmp(&b.issue.issue_id))
    });

    let total = nearby.len();
    let start = page.page.saturating_mul(page.page_size).min(total);
    let end = start.saturating_add(page.page_size).min(total);
    let issues: Vec<NearbyIssue> = nearby.drain(start..end).collect();

    Ok(NearbyPage {
        issues,
        total,
        page: page.page,
        page_size: page.page_size,
        has_more: end < total,
    })
}
