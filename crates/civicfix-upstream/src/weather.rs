//! Historical daily weather from the Open-Meteo archive API.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use civicfix_core::config::UpstreamConfig;
use civicfix_core::errors::UpstreamError;
use civicfix_core::models::{GeoPoint, WeatherSummary};
use civicfix_core::traits::IWeatherProvider;

use crate::transport::{HttpClient, HttpClientConfig};

pub const WEATHER_SERVICE: &str = "weather";

const DAILY_FIELDS: &str =
    "precipitation_sum,temperature_2m_mean,wind_speed_10m_max,relative_humidity_2m_mean,snowfall_sum";

/// Heavy-rain threshold for the generated note (mm/day).
const HEAVY_RAIN_MM: f64 = 20.0;

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: Option<DailySeries>,
}

/// Column-oriented daily series; each vector has one entry per day.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub temperature_2m_mean: Vec<Option<f64>>,
    pub wind_speed_10m_max: Vec<Option<f64>>,
    pub relative_humidity_2m_mean: Vec<Option<f64>>,
    pub snowfall_sum: Vec<Option<f64>>,
}

/// First day of the series as a summary. `None` when the series is empty.
pub fn summarize(series: &DailySeries) -> Option<WeatherSummary> {
    if series.time.is_empty() {
        return None;
    }
    let first = |column: &[Option<f64>]| column.first().copied().flatten();
    let precipitation = first(&series.precipitation_sum);
    let snowfall = first(&series.snowfall_sum);

    let weather_note = match (precipitation, snowfall) {
        (_, Some(s)) if s > 0.0 => Some("snowfall recorded".to_string()),
        (Some(p), _) if p >= HEAVY_RAIN_MM => Some("heavy rain in the last 24h".to_string()),
        (Some(p), _) if p > 0.0 => Some("light rain in the last 24h".to_string()),
        _ => None,
    };

    Some(WeatherSummary {
        precipitation_24h_mm: precipitation,
        temperature_c_avg: first(&series.temperature_2m_mean),
        windspeed_max_ms: first(&series.wind_speed_10m_max),
        relative_humidity_avg: first(&series.relative_humidity_2m_mean),
        snowfall_24h_mm: snowfall,
        weather_note,
    })
}

/// Open-Meteo archive client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: HttpClient,
}

impl OpenMeteoClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = HttpClient::new(HttpClientConfig::new(
            WEATHER_SERVICE,
            &config.weather_url,
            std::time::Duration::from_secs(config.weather_timeout_secs),
        ))?;
        Ok(Self::new(http))
    }
}

impl IWeatherProvider for OpenMeteoClient {
    async fn summary(
        &self,
        location: GeoPoint,
        at: DateTime<Utc>,
    ) -> Result<Option<WeatherSummary>, UpstreamError> {
        let day = at.date_naive().to_string();
        let query = [
            ("latitude", location.lat.to_string()),
            ("longitude", location.lon.to_string()),
            ("start_date", day.clone()),
            ("end_date", day),
            ("daily", DAILY_FIELDS.to_string()),
            ("wind_speed_unit", "ms".to_string()),
            ("timezone", "UTC".to_string()),
        ];
        let response: ArchiveResponse = self.http.get_json("", &query).await?;
        let summary = response.daily.as_ref().and_then(summarize);
        debug!(found = summary.is_some(), "weather lookup complete");
        Ok(summary)
    }
}

/// Weather provider used when weather context is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWeather;

impl IWeatherProvider for NoWeather {
    async fn summary(
        &self,
        _location: GeoPoint,
        _at: DateTime<Utc>,
    ) -> Result<Option<WeatherSummary>, UpstreamError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_first_day() {
        let raw = r#"{
            "daily": {
                "time": ["2025-06-01"],
                "precipitation_sum": [32.4],
                "temperature_2m_mean": [24.1],
                "wind_speed_10m_max": [6.3],
                "relative_humidity_2m_mean": [88.0],
                "snowfall_sum": [0.0]
            }
        }"#;
        let response: ArchiveResponse = serde_json::from_str(raw).unwrap();
        let summary = summarize(response.daily.as_ref().unwrap()).unwrap();
        assert_eq!(summary.precipitation_24h_mm, Some(32.4));
        assert_eq!(summary.windspeed_max_ms, Some(6.3));
        assert_eq!(summary.weather_note.as_deref(), Some("heavy rain in the last 24h"));
    }

    #[test]
    fn nulls_and_empty_series() {
        let raw = r#"{"daily": {"time": ["2025-06-01"], "precipitation_sum": [null]}}"#;
        let response: ArchiveResponse = serde_json::from_str(raw).unwrap();
        let summary = summarize(response.daily.as_ref().unwrap()).unwrap();
        assert_eq!(summary.precipitation_24h_mm, None);
        assert_eq!(summary.temperature_c_avg, None);
        assert_eq!(summary.weather_note, None);

        assert!(summarize(&DailySeries::default()).is_none());
    }

    #[tokio::test]
    async fn no_weather_returns_none() {
        let at = Utc::now();
        let summary = NoWeather
            .summary(GeoPoint { lat: 0.0, lon: 0.0 }, at)
            .await
            .unwrap();
        assert!(summary.is_none());
    }
}
