use chrono::Utc;
use proptest::prelude::*;

use civicfix_core::config::EngagementConfig;
use civicfix_core::models::{EngagementAction, IssueStatus};
use civicfix_storage::queries::engagement::apply_action;
use test_fixtures::builders::sample_issue;

fn action() -> impl Strategy<Value = EngagementAction> {
    prop_oneof![
        Just(EngagementAction::Upvote),
        Just(EngagementAction::RemoveUpvote),
        Just(EngagementAction::Report),
    ]
}

proptest! {
    #[test]
    fn upvote_counter_matches_saturating_model(
        ups in proptest::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut issue = sample_issue("p-1");
        let t = EngagementConfig::default();
        let mut model: u64 = 0;
        for up in ups {
            let action = if up { EngagementAction::Upvote } else { EngagementAction::RemoveUpvote };
            apply_action(&mut issue, action, &t, Utc::now());
            model = if up { model + 1 } else { model.saturating_sub(1) };
        }
        prop_assert_eq!(issue.upvotes.open, model);
        prop_assert_eq!(issue.status, IssueStatus::Open);
    }

    #[test]
    fn report_buckets_stay_below_their_threshold(
        actions in proptest::collection::vec(action(), 0..120),
        spam in 1u64..6,
        reopen in 1u64..6,
    ) {
        let mut issue = sample_issue("p-2");
        let t = EngagementConfig { spam_report_threshold: spam, reopen_report_threshold: reopen };
        for a in actions {
            let before = issue.status;
            if let Some(tr) = apply_action(&mut issue, a, &t, Utc::now()) {
                prop_assert_eq!(tr.from, before);
                prop_assert_ne!(tr.from, tr.to);
            }
            prop_assert!(issue.reports.open < spam);
            prop_assert!(issue.reports.closed < reopen);
            match issue.status {
                IssueStatus::Closed => prop_assert_eq!(issue.closed_by.as_deref(), Some("community_report")),
                IssueStatus::Open => prop_assert!(issue.closed_by.is_none()),
                _ => {}
            }
        }
    }
}
