use chrono::{DateTime, Utc};

use crate::errors::UpstreamError;
use crate::models::{GeoPoint, WeatherSummary};

/// Historical weather lookup.
#[allow(async_fn_in_trait)]
pub trait IWeatherProvider: Send + Sync {
    /// Weather for the day of `at` at `location`. `Ok(None)` when the
    /// provider has no data.
    async fn summary(
        &self,
        location: GeoPoint,
        at: DateTime<Utc>,
    ) -> Result<Option<WeatherSummary>, UpstreamError>;
}
