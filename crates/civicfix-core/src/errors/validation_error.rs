/// Input validation errors, raised before any external call is made.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid location: lat {lat}, lon {lon}")]
    InvalidLocation { lat: f64, lon: f64 },

    #[error("confidence {value} for label '{label}' is outside [0, 1]")]
    ConfidenceOutOfRange { label: String, value: f64 },

    #[error("required field '{field}' is empty")]
    EmptyField { field: String },

    #[error("invalid paging: {reason}")]
    InvalidPage { reason: String },

    #[error("invalid radius: {radius_km} km")]
    InvalidRadius { radius_km: f64 },
}
