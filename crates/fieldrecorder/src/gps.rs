//! GPS fix records.
//!
//! A [`GpsFix`] is what the device geolocation service hands back: a
//! position, an optional horizontal accuracy and the time it was taken.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::convert::Converter;
use crate::error::Result;
use crate::geodesy::GeodeticCoordinate;
use crate::gridref::GridReference;

/// A single position report from a GPS receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Latitude in degrees (WGS84 as reported).
    #[serde(alias = "lat")]
    pub latitude: f64,

    /// Longitude in degrees (WGS84 as reported).
    #[serde(alias = "lon")]
    pub longitude: f64,

    /// Horizontal accuracy radius in metres, when the receiver reports one.
    #[serde(default, alias = "accuracy", skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,

    /// When the fix was taken.
    #[serde(alias = "timestamp", deserialize_with = "deserialize_timestamp")]
    pub captured_at: DateTime<Utc>,
}

/// Timestamps as stored by recorders: RFC 3339 text or Unix epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Rfc3339(DateTime<Utc>),
    EpochMillis(i64),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Rfc3339(at) => Ok(at),
        RawTimestamp::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| de::Error::custom(format!("timestamp {ms} ms is out of range"))),
    }
}

impl GpsFix {
    /// Create a fix taken now.
    ///
    /// Non-finite accuracy values are dropped.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, accuracy_m: Option<f64>) -> Self {
        Self::at(latitude, longitude, accuracy_m, Utc::now())
    }

    /// Create a fix with an explicit timestamp.
    #[must_use]
    pub fn at(
        latitude: f64,
        longitude: f64,
        accuracy_m: Option<f64>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: accuracy_m.filter(|a| a.is_finite()),
            captured_at,
        }
    }

    /// The fix position as a coordinate.
    #[must_use]
    pub fn coordinate(&self) -> GeodeticCoordinate {
        GeodeticCoordinate::new(self.latitude, self.longitude)
    }

    /// Whether the reported accuracy is worse than `limit_m`.
    ///
    /// A fix without an accuracy figure is never considered worse.
    #[must_use]
    pub fn is_less_accurate_than(&self, limit_m: f64) -> bool {
        self.accuracy_m.is_some_and(|a| a > limit_m)
    }

    /// The grid reference of this fix, `None` if off the National Grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCoordinate`] if the fix holds
    /// out-of-range degrees.
    pub fn grid_reference(&self, converter: &Converter) -> Result<Option<GridReference>> {
        converter.to_grid_reference(self.coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_drops_non_finite_accuracy() {
        let fix = GpsFix::new(51.0, -1.0, Some(f64::INFINITY));
        assert!(fix.accuracy_m.is_none());
        let fix = GpsFix::new(51.0, -1.0, Some(4.5));
        assert_eq!(fix.accuracy_m, Some(4.5));
    }

    #[test]
    fn test_less_accurate_than() {
        assert!(GpsFix::new(51.0, -1.0, Some(60.0)).is_less_accurate_than(50.0));
        assert!(!GpsFix::new(51.0, -1.0, Some(50.0)).is_less_accurate_than(50.0));
        assert!(!GpsFix::new(51.0, -1.0, None).is_less_accurate_than(50.0));
    }

    #[test]
    fn test_grid_reference() {
        let fix = GpsFix::new(51.5074, -0.1278, Some(8.0));
        let r = fix.grid_reference(&Converter::default()).unwrap().unwrap();
        assert_eq!(r.to_string(), "TQ 2991 8043");
    }

    #[test]
    fn test_grid_reference_overseas() {
        let fix = GpsFix::new(48.8566, 2.3522, None);
        assert!(fix.grid_reference(&Converter::default()).unwrap().is_none());
    }

    #[test]
    fn test_serialization() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap();
        let fix = GpsFix::at(52.1, -1.5, Some(3.0), at);
        let json = serde_json::to_string(&fix).unwrap();
        let back: GpsFix = serde_json::from_str(&json).unwrap();
        assert_eq!(fix, back);
    }

    #[test]
    fn test_deserialize_short_field_names() {
        let json = r#"{"lat": 52.1, "lon": -1.5, "accuracy": 12.0, "timestamp": "2025-03-14T10:30:00Z"}"#;
        let fix: GpsFix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.latitude, 52.1);
        assert_eq!(fix.accuracy_m, Some(12.0));
    }

    #[test]
    fn test_deserialize_epoch_millis_timestamp() {
        let json = r#"{"lat": 52.1, "lon": -1.5, "timestamp": 1710412200000, "accuracy": 12.0}"#;
        let fix: GpsFix = serde_json::from_str(json).unwrap();
        assert_eq!(
            fix.captured_at,
            Utc.with_ymd_and_hms(2024, 3, 14, 10, 30, 0).unwrap()
        );
        assert_eq!(fix.accuracy_m, Some(12.0));
    }

    #[test]
    fn test_deserialize_rejects_bad_timestamp() {
        let json = r#"{"lat": 52.1, "lon": -1.5, "timestamp": "yesterday"}"#;
        assert!(serde_json::from_str::<GpsFix>(json).is_err());
        let json = r#"{"lat": 52.1, "lon": -1.5, "timestamp": 9223372036854775807}"#;
        assert!(serde_json::from_str::<GpsFix>(json).is_err());
    }

    #[test]
    fn test_accuracy_is_optional() {
        let json = r#"{"latitude": 52.1, "longitude": -1.5, "captured_at": "2025-03-14T10:30:00Z"}"#;
        let fix: GpsFix = serde_json::from_str(json).unwrap();
        assert!(fix.accuracy_m.is_none());
    }
}
