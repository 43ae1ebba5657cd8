use chrono::Utc;
use proptest::prelude::*;

use civicfix_core::config::RetrievalConfig;
use civicfix_core::models::{CategoryMode, GeoPoint};
use civicfix_retrieval::RetrievalStrategy;

proptest! {
    #[test]
    fn only_exact_dimensionality_selects_vector_mode(len in 0usize..16, expected in 1usize..16) {
        let v = vec![0.5f32; len];
        let strategy = RetrievalStrategy::select(Some(&v), expected);
        prop_assert_eq!(strategy.is_vector(), len == expected);
    }

    #[test]
    fn issue_queries_always_carry_geo_and_time_filters(
        vector in any::<bool>(),
        k in 1usize..20,
        lookback in -5i64..400,
        hinted in any::<bool>(),
    ) {
        let strategy = if vector {
            RetrievalStrategy::VectorFiltered(vec![1.0, 0.0])
        } else {
            RetrievalStrategy::FilteredOnly
        };
        let hints = if hinted { vec!["waterlogging".to_string()] } else { vec![] };
        let config = RetrievalConfig::default();
        let now = Utc::now();
        let q = strategy.issue_query(GeoPoint { lat: 10.0, lon: 20.0 }, &hints, lookback, k, &config, now);

        prop_assert!(q.geo.is_some());
        prop_assert!(q.created_after.is_some_and(|t| t <= now));
        prop_assert!(q.limit >= k);
        match (q.categories, vector) {
            (Some(c), true) => prop_assert_eq!(c.mode, CategoryMode::Boost),
            (Some(c), false) => prop_assert_eq!(c.mode, CategoryMode::Strict),
            (None, _) => prop_assert!(!hinted),
        }
    }
}
