use serde::{Deserialize, Serialize};

use super::defaults;

/// Paging defaults for the nearby-issues listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_radius_km: f64,
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_radius_km: defaults::DEFAULT_LIST_RADIUS_KM,
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: defaults::DEFAULT_MAX_PAGE_SIZE,
        }
    }
}
