//! Query planning for the two retrieval modes.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use civicfix_core::config::RetrievalConfig;
use civicfix_core::models::{
    CategoryFilter, CategoryMode, FixQuery, GeoFilter, GeoPoint, IssueQuery,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalStrategy {
    /// Rank by cosine similarity inside the hard filters. Category hints
    /// only break ties.
    VectorFiltered(Vec<f32>),
    /// Filters only, newest first. Category hints are a hard constraint.
    FilteredOnly,
}

impl RetrievalStrategy {
    /// Vector mode only for a vector of `expected_dims` finite components.
    pub fn select(query_embedding: Option<&[f32]>, expected_dims: usize) -> Self {
        match query_embedding {
            Some(v) if v.len() == expected_dims && v.iter().all(|x| x.is_finite()) => {
                Self::VectorFiltered(v.to_vec())
            }
            Some(v) => {
                debug!(
                    actual = v.len(),
                    expected = expected_dims,
                    "query embedding unusable, falling back to filtered retrieval"
                );
                Self::FilteredOnly
            }
            None => Self::FilteredOnly,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::VectorFiltered(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::VectorFiltered(_) => "vector_filtered",
            Self::FilteredOnly => "filtered_only",
        }
    }

    fn categories(&self, hints: &[String]) -> Option<CategoryFilter> {
        if hints.is_empty() {
            return None;
        }
        let mode = match self {
            Self::VectorFiltered(_) => CategoryMode::Boost,
            Self::FilteredOnly => CategoryMode::Strict,
        };
        Some(CategoryFilter {
            labels: hints.to_vec(),
            mode,
        })
    }

    fn vector(&self) -> Option<Vec<f32>> {
        match self {
            Self::VectorFiltered(v) => Some(v.clone()),
            Self::FilteredOnly => None,
        }
    }

    /// Candidates to request for `k` results. Vector mode over-fetches so
    /// deduplication still leaves `k`.
    pub fn candidate_limit(&self, k: usize, config: &RetrievalConfig) -> usize {
        match self {
            Self::VectorFiltered(_) => k.saturating_mul(config.overfetch_factor.max(1)),
            Self::FilteredOnly => k,
        }
    }

    pub fn issue_query(
        &self,
        location: GeoPoint,
        hints: &[String],
        lookback_days: i64,
        k: usize,
        config: &RetrievalConfig,
        now: DateTime<Utc>,
    ) -> IssueQuery {
        IssueQuery {
            geo: Some(GeoFilter {
                center: location,
                radius_m: config.issue_radius_m,
            }),
            created_after: lookback_cutoff(now, lookback_days),
            categories: self.categories(hints),
            vector: self.vector(),
            limit: self.candidate_limit(k, config),
        }
    }

    pub fn fix_query(&self, hints: &[String], k: usize, config: &RetrievalConfig) -> FixQuery {
        FixQuery {
            categories: self.categories(hints),
            vector: self.vector(),
            limit: self.candidate_limit(k, config),
        }
    }
}

/// Oldest creation time inside the lookback window. Negative windows
/// collapse to `now`; a window reaching past the representable range
/// admits every issue.
fn lookback_cutoff(now: DateTime<Utc>, lookback_days: i64) -> Option<DateTime<Utc>> {
    let cutoff = Duration::try_days(lookback_days.max(0)).and_then(|d| now.checked_sub_signed(d));
    if cutoff.is_none() {
        debug!(lookback_days, "lookback exceeds the calendar, dropping the time filter");
    }
    cutoff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["waterlogging".to_string()]
    }

    #[test]
    fn selection_requires_expected_shape() {
        assert!(RetrievalStrategy::select(Some(&[0.1, 0.2, 0.3]), 3).is_vector());
        assert!(!RetrievalStrategy::select(Some(&[0.1, 0.2]), 3).is_vector());
        assert!(!RetrievalStrategy::select(Some(&[0.1, f32::NAN, 0.3]), 3).is_vector());
        assert!(!RetrievalStrategy::select(None, 3).is_vector());
    }

    #[test]
    fn vector_mode_boosts_and_overfetches() {
        let config = RetrievalConfig::default();
        let now = Utc::now();
        let q = RetrievalStrategy::VectorFiltered(vec![1.0])
            .issue_query(GeoPoint { lat: 1.0, lon: 2.0 }, &hints(), 30, 5, &config, now);
        assert_eq!(q.limit, 10);
        assert_eq!(q.categories.unwrap().mode, CategoryMode::Boost);
        assert_eq!(q.created_after, Some(now - Duration::days(30)));
        assert_eq!(q.geo.unwrap().radius_m, config.issue_radius_m);
        assert!(q.vector.is_some());
    }

    #[test]
    fn fallback_is_strict_when_hinted() {
        let config = RetrievalConfig::default();
        let q = RetrievalStrategy::FilteredOnly.issue_query(
            GeoPoint { lat: 1.0, lon: 2.0 },
            &hints(),
            30,
            5,
            &config,
            Utc::now(),
        );
        assert_eq!(q.limit, 5);
        assert_eq!(q.categories.unwrap().mode, CategoryMode::Strict);
        assert!(q.vector.is_none());

        let unhinted = RetrievalStrategy::FilteredOnly.fix_query(&[], 3, &config);
        assert!(unhinted.categories.is_none());
    }

    #[test]
    fn oversized_lookback_drops_time_filter() {
        let config = RetrievalConfig::default();
        let now = Utc::now();
        for days in [1_000_000_000, i64::MAX] {
            let q = RetrievalStrategy::FilteredOnly
                .issue_query(GeoPoint { lat: 1.0, lon: 2.0 }, &[], days, 5, &config, now);
            assert_eq!(q.created_after, None);
            assert!(q.geo.is_some());
        }
        let q = RetrievalStrategy::FilteredOnly
            .issue_query(GeoPoint { lat: 1.0, lon: 2.0 }, &[], -3, 5, &config, now);
        assert_eq!(q.created_after, Some(now));
    }
}
