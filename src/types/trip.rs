use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::date::iso8601;
use crate::util::id;

/// One journey recorded by a vehicle's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, deserialize_with = "id::lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<Location>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Elapsed time between start and end, when both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.ended_at? - self.started_at?)
    }
}

/// A GPS fix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellites: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// A named sensor reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_decodes_locations_and_duration() {
        let trip: Trip = serde_json::from_str(
            r#"{
                "id": "t1",
                "startedAt": "2021-03-01T08:00:00.000+00:00",
                "endedAt": "2021-03-01T08:45:30.000+00:00",
                "startLocation": {"latitude": 50.63, "longitude": 3.06, "satellites": 7},
                "endLocation": {"latitude": 50.69, "longitude": 3.17}
            }"#,
        )
        .unwrap();
        assert_eq!(trip.duration(), Some(chrono::Duration::seconds(45 * 60 + 30)));
        assert_eq!(trip.start_location.unwrap().satellites, Some(7));
        assert_eq!(trip.end_location.unwrap().longitude, Some(3.17));
    }

    #[test]
    fn open_trip_has_no_duration() {
        let trip: Trip = serde_json::from_str(r#"{"startedAt":"2021-03-01T08:00:00Z"}"#).unwrap();
        assert!(trip.duration().is_none());
    }
}
