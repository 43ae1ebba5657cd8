/// Expected dimensionality of the document embedding field.
pub const EMBEDDING_DIMENSIONS: usize = 3072;

/// Role tag prefixed to composed issue text before embedding.
pub const ISSUE_ROLE_TAG: &str = "Issue";

/// Role tag prefixed to composed fix text before embedding.
pub const FIX_ROLE_TAG: &str = "Fix";

/// `closed_by` value written when community reports close an issue.
pub const COMMUNITY_REPORT_CLOSER: &str = "community_report";

/// Mean Earth radius in meters, used by haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Canonical civic issue labels paired with the default remediation used
/// when the classifier omits a predicted fix.
pub const CANONICAL_LABELS: &[(&str, &str)] = &[
    (
        "exposed_power_cables",
        "Secure and insulate cables; coordinate with electricity department; cordon area.",
    ),
    (
        "illegal_dumping_bulky_waste",
        "Clear bulky items, schedule pickup and enforce fines.",
    ),
    (
        "illegal_hoarding",
        "Remove hoarding and document permit violations.",
    ),
    (
        "waterlogging",
        "Desilt drains and clear blockages; regrade local drain flows.",
    ),
    (
        "encroachment_public_space",
        "Remove encroachment and restore pedestrian path.",
    ),
    (
        "illegal_construction_small",
        "Issue stop-work and remove temporary structure.",
    ),
    (
        "visible_pollution",
        "Clean area and enforce anti-burning rules.",
    ),
    ("streetlight_out", "Replace lamp and driver; repair wiring."),
    (
        "overflowing_garbage_bin",
        "Empty bin and increase pickup frequency.",
    ),
    (
        "broken_infrastructure",
        "Patch pothole or replace pavement slab.",
    ),
    (
        "public_toilet_nonfunctional",
        "Repair plumbing and deep-clean facility.",
    ),
    ("sewer_blockage", "Clear blockage and inspect pipe."),
    (
        "uncollected_household_waste",
        "Collect waste and adjust schedule.",
    ),
    (
        "unregulated_construction_activity",
        "Inspect and halt unsafe work.",
    ),
    (
        "public_health_hazard",
        "Remove stagnant water; fogging and larvicide if needed.",
    ),
];

/// Canonical label form: trimmed, lowercase, whitespace runs replaced by
/// a single underscore.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether `label` (already normalized) belongs to the canonical vocabulary.
pub fn is_canonical_label(label: &str) -> bool {
    CANONICAL_LABELS.iter().any(|(name, _)| *name == label)
}

/// Default predicted fix for a canonical label.
pub fn default_predicted_fix(label: &str) -> Option<&'static str> {
    CANONICAL_LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, fix)| *fix)
}
