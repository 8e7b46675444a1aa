use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Five-tier severity derived from an AQI reading
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "alert_priority")]
pub enum AlertPriority {
    #[sqlx(rename = "LEVEL_1")]
    #[serde(rename = "LEVEL_1")]
    Level1,
    #[sqlx(rename = "LEVEL_2")]
    #[serde(rename = "LEVEL_2")]
    Level2,
    #[sqlx(rename = "LEVEL_3")]
    #[serde(rename = "LEVEL_3")]
    Level3,
    #[sqlx(rename = "LEVEL_4")]
    #[serde(rename = "LEVEL_4")]
    Level4,
    #[sqlx(rename = "LEVEL_5")]
    #[serde(rename = "LEVEL_5")]
    Level5,
}

impl AlertPriority {
    pub fn from_aqi(aqi: i32) -> Self {
        match aqi {
            i32::MIN..=1 => AlertPriority::Level1,
            2 => AlertPriority::Level2,
            3 => AlertPriority::Level3,
            4 => AlertPriority::Level4,
            _ => AlertPriority::Level5,
        }
    }

    pub fn level(self) -> i16 {
        match self {
            AlertPriority::Level1 => 1,
            AlertPriority::Level2 => 2,
            AlertPriority::Level3 => 3,
            AlertPriority::Level4 => 4,
            AlertPriority::Level5 => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertPriority::Level1 => "Bon",
            AlertPriority::Level2 => "Modéré",
            AlertPriority::Level3 => "Malsain",
            AlertPriority::Level4 => "Dangereux",
            AlertPriority::Level5 => "Très Dangereux",
        }
    }

    /// Hex color used in emails and clients
    pub fn color(self) -> &'static str {
        match self {
            AlertPriority::Level1 => "#00e400",
            AlertPriority::Level2 => "#ffff00",
            AlertPriority::Level3 => "#ff7e00",
            AlertPriority::Level4 => "#ff0000",
            AlertPriority::Level5 => "#8f3f97",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_aqi_boundaries() {
        assert_eq!(AlertPriority::from_aqi(-3), AlertPriority::Level1);
        assert_eq!(AlertPriority::from_aqi(0), AlertPriority::Level1);
        assert_eq!(AlertPriority::from_aqi(1), AlertPriority::Level1);
        assert_eq!(AlertPriority::from_aqi(2), AlertPriority::Level2);
        assert_eq!(AlertPriority::from_aqi(3), AlertPriority::Level3);
        assert_eq!(AlertPriority::from_aqi(4), AlertPriority::Level4);
        assert_eq!(AlertPriority::from_aqi(5), AlertPriority::Level5);
        assert_eq!(AlertPriority::from_aqi(250), AlertPriority::Level5);
    }

    #[test]
    fn test_levels_are_monotonic() {
        let levels: Vec<i16> = (0..=7).map(|aqi| AlertPriority::from_aqi(aqi).level()).collect();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(AlertPriority::Level4 > AlertPriority::Level3);
    }

    #[test]
    fn test_labels_and_colors() {
        assert_eq!(AlertPriority::Level3.label(), "Malsain");
        assert_eq!(AlertPriority::Level5.label(), "Très Dangereux");
        assert_eq!(AlertPriority::Level1.color(), "#00e400");
        assert_eq!(AlertPriority::Level5.color(), "#8f3f97");
    }

    #[test]
    fn test_serializes_as_level_name() {
        let json = serde_json::to_string(&AlertPriority::Level4).unwrap();
        assert_eq!(json, "\"LEVEL_4\"");
    }
}
