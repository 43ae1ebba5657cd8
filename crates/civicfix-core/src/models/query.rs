use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// How category hints constrain a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryMode {
    /// Only documents carrying at least one hinted label match.
    Strict,
    /// Every document matches; hinted labels break ranking ties.
    Boost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub labels: Vec<String>,
    pub mode: CategoryMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFilter {
    pub center: GeoPoint,
    pub radius_m: f64,
}

/// Store-agnostic description of an issue search. With `vector` set,
/// results rank by cosine similarity; without, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueQuery {
    pub geo: Option<GeoFilter>,
    /// Only issues created at or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    pub categories: Option<CategoryFilter>,
    pub vector: Option<Vec<f32>>,
    pub limit: usize,
}

/// Store-agnostic description of a fix search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixQuery {
    pub categories: Option<CategoryFilter>,
    pub vector: Option<Vec<f32>>,
    pub limit: usize,
}
