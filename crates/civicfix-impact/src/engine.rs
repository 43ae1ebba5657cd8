use tracing::debug;

use civicfix_core::config::ScoringConfig;
use civicfix_core::models::{ImpactAssessment, Issue};

use crate::factors::{ImpactContext, ImpactInputs};
use crate::formula::{self, ImpactBreakdown};

/// Impact engine holding the (configurable) scoring weights.
#[derive(Debug, Clone, Default)]
pub struct ImpactEngine {
    weights: ScoringConfig,
}

impl ImpactEngine {
    /// Create an engine with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights.
    pub fn with_weights(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringConfig {
        &self.weights
    }

    /// Score raw inputs.
    pub fn assess(&self, inputs: &ImpactInputs, ctx: &ImpactContext) -> ImpactAssessment {
        formula::compute(inputs, ctx, &self.weights)
    }

    /// Score raw inputs with a full factor breakdown.
    pub fn breakdown(&self, inputs: &ImpactInputs, ctx: &ImpactContext) -> ImpactBreakdown {
        formula::compute_breakdown(inputs, ctx, &self.weights)
    }

    /// Score an existing issue from its severity, summed counters, and age.
    pub fn assess_issue(
        &self,
        issue: &Issue,
        density_norm: f64,
        ctx: &ImpactContext,
    ) -> ImpactAssessment {
        let inputs = ImpactInputs::from_issue(issue, density_norm);
        let assessment = self.assess(&inputs, ctx);
        debug!(
            issue_id = %issue.issue_id,
            impact_score = assessment.impact_score,
            visibility_radius_m = assessment.visibility_radius_m,
            "issue rescored"
        );
        assessment
    }

    /// Rescore a batch of issues against one reference time.
    pub fn assess_batch(&self, issues: &[Issue], ctx: &ImpactContext) -> Vec<ImpactAssessment> {
        issues
            .iter()
            .map(|issue| self.assess(&ImpactInputs::from_issue(issue, 0.0), ctx))
            .collect()
    }
}
