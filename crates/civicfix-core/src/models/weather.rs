use serde::{Deserialize, Serialize};

/// Weather around the report time, as classifier context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSummary {
    pub precipitation_24h_mm: Option<f64>,
    pub temperature_c_avg: Option<f64>,
    pub windspeed_max_ms: Option<f64>,
    pub relative_humidity_avg: Option<f64>,
    pub snowfall_24h_mm: Option<f64>,
    pub weather_note: Option<String>,
}

impl WeatherSummary {
    /// One-line rendering for prompt context. Missing values are skipped.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = self.precipitation_24h_mm {
            parts.push(format!("precipitation_24h={v:.1}mm"));
        }
        if let Some(v) = self.temperature_c_avg {
            parts.push(format!("temp_avg={v:.1}C"));
        }
        if let Some(v) = self.windspeed_max_ms {
            parts.push(format!("wind_max={v:.1}m/s"));
        }
        if let Some(v) = self.relative_humidity_avg {
            parts.push(format!("humidity_avg={v:.0}%"));
        }
        if let Some(v) = self.snowfall_24h_mm {
            parts.push(format!("snowfall_24h={v:.1}mm"));
        }
        if let Some(note) = &self.weather_note {
            parts.push(note.clone());
        }
        parts.join(", ")
    }
}
