use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_M;
use crate::errors::ValidationError;

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a validated point.
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        let point = Self { lat, lon };
        point.validate()?;
        Ok(point)
    }

    /// Latitude within [-90, 90], longitude within [-180, 180], both finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ok = self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon);
        if ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidLocation {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}
