// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "civicfix.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Scoring ---
pub const DEFAULT_W_SEVERITY: f64 = 40.0;
pub const DEFAULT_W_UPVOTES: f64 = 12.0;
pub const DEFAULT_W_REPORTS: f64 = 10.0;
pub const DEFAULT_W_DENSITY: f64 = 15.0;
pub const DEFAULT_W_RECENCY: f64 = 25.0;
pub const DEFAULT_RECENCY_TAU_DAYS: f64 = 14.0;
pub const DEFAULT_SCORE_NORMALIZER: f64 = 65.0;
pub const DEFAULT_RADIUS_BASE_M: f64 = 100.0;
pub const DEFAULT_RADIUS_GROWTH: f64 = 0.06;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "gemini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";
pub const DEFAULT_EMBEDDING_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;

// --- Retrieval ---
pub const DEFAULT_ISSUE_RADIUS_M: f64 = 500.0;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;
pub const DEFAULT_ISSUE_TOP_K: usize = 5;
pub const DEFAULT_FIX_TOP_K: usize = 3;
pub const DEFAULT_OVERFETCH_FACTOR: usize = 2;
pub const DEFAULT_SNIPPET_CHARS: usize = 160;
pub const DEFAULT_RETRIEVAL_TIMEOUT_SECS: u64 = 10;

// --- Indexing ---
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MAX_LABELS: usize = 5;

// --- Engagement ---
pub const DEFAULT_SPAM_REPORT_THRESHOLD: u64 = 3;
pub const DEFAULT_REOPEN_REPORT_THRESHOLD: u64 = 3;

// --- Upstream ---
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8001";
pub const DEFAULT_VERIFIER_URL: &str = "http://localhost:8002";
pub const DEFAULT_WEATHER_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_VERIFIER_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 8_000;

// --- Listing ---
pub const DEFAULT_LIST_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
