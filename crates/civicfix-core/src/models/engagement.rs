use serde::{Deserialize, Serialize};

use super::{Issue, IssueStatus};

/// A community action on an issue. Per-user toggle state is owned by the
/// caller; this only moves the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementAction {
    Upvote,
    RemoveUpvote,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: IssueStatus,
    pub to: IssueStatus,
}

/// Issue state after an engagement mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementOutcome {
    pub issue: Issue,
    /// Set when a report threshold changed the lifecycle state.
    pub transition: Option<StatusTransition>,
    /// False when the action was ignored (e.g. reports on spam).
    pub applied: bool,
}
