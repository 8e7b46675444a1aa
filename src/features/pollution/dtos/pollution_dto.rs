use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct CoordinatesQuery {
    /// Latitude, -90 to 90
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    /// Longitude, -180 to 180
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[validate(schema(function = "validate_time_range"))]
pub struct HistoryQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,

    /// Unix seconds, inclusive
    pub start: i64,

    /// Unix seconds, inclusive
    pub end: i64,
}

fn validate_time_range(query: &HistoryQuery) -> Result<(), ValidationError> {
    if query.start > query.end {
        let mut err = ValidationError::new("time_range");
        err.message = Some("start must not be after end".into());
        return Err(err);
    }
    Ok(())
}
