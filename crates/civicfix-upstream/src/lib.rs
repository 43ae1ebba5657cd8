//! # civicfix-upstream
//!
//! Boundary clients for the services this core consumes but does not own:
//! the issue classifier, the fix verifier, and historical weather.
//! Each client performs exactly one attempt per call; [`retry::with_retry`]
//! layers timeouts and bounded exponential backoff on top.

pub mod classifier;
pub mod retry;
pub mod transport;
pub mod verifier;
pub mod weather;

pub use classifier::HttpClassifier;
pub use retry::with_retry;
pub use transport::{HttpClient, HttpClientConfig};
pub use verifier::HttpVerifier;
pub use weather::{NoWeather, OpenMeteoClient};
