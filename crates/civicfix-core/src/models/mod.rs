mod classification;
mod engagement;
mod evidence;
mod fix;
mod geo;
mod impact;
mod issue;
mod label;
mod listing;
mod query;
mod verification;
mod weather;

pub use classification::{CandidateLabel, ClassificationRequest, ClassifierOutput};
pub use engagement::{EngagementAction, EngagementOutcome, StatusTransition};
pub use evidence::{truncate_excerpt, EvidenceKind, EvidenceSnippet};
pub use fix::{FixAttempt, FixOutcome, FixRecord};
pub use geo::GeoPoint;
pub use impact::ImpactAssessment;
pub use issue::{Issue, IssueStatus, StatusCounters};
pub use label::DetectedIssueLabel;
pub use listing::{NearbyIssue, NearbyPage, PageRequest};
pub use query::{CategoryFilter, CategoryMode, FixQuery, GeoFilter, IssueQuery};
pub use verification::{
    FixedState, OutcomeHint, OverallOutcome, PerIssueResult, VerificationRequest, VerifierOutput,
};
pub use weather::WeatherSummary;
