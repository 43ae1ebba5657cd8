mod classifier;
mod embedding;
mod evidence_store;
mod verifier;
mod weather;

pub use classifier::IIssueClassifier;
pub use embedding::IEmbeddingProvider;
pub use evidence_store::{IEvidenceStore, RescoreFn};
pub use verifier::IFixVerifier;
pub use weather::IWeatherProvider;
