use serde::{Deserialize, Serialize};

use super::Issue;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyIssue {
    pub issue: Issue,
    pub distance_m: f64,
}

/// One page of issues around a point, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPage {
    pub issues: Vec<NearbyIssue>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}
