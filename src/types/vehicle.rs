use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trip::{Location, Signal};
use crate::util::date::iso8601;
use crate::util::id;

/// A vehicle registered to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, deserialize_with = "id::lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<String>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

/// The telematics box plugged into a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, deserialize_with = "id::lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Latest known state of a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerometer: Option<Accelerometer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Signal>,
}

impl Status {
    /// Most recent reading of the named signal.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals
            .iter()
            .filter(|signal| signal.name.as_deref() == Some(name))
            .max_by_key(|signal| signal.date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accelerometer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, with = "iso8601::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Body of a device pairing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingRequest {
    pub device_id: String,
    pub device_pin: String,
}

impl PairingRequest {
    pub fn new(device_id: impl Into<String>, device_pin: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_pin: device_pin.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn vehicle_decodes_nested_device() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": "42",
            "name": "Van",
            "kType": "12345",
            "licensePlate": "AB-123-CD",
            "device": {"id": 9001, "createdAt": "2017-10-05T10:00:00Z"}
        }))
        .unwrap();
        assert_eq!(vehicle.k_type.as_deref(), Some("12345"));
        assert_eq!(vehicle.license_plate.as_deref(), Some("AB-123-CD"));
        let device = vehicle.device.unwrap();
        assert_eq!(device.id.as_deref(), Some("9001"));
        assert!(device.created_at.is_some());
    }

    #[test]
    fn status_picks_latest_signal_reading() {
        let status: Status = serde_json::from_value(json!({
            "accelerometer": {"x": 0.1, "y": -0.2, "z": 9.8},
            "signals": [
                {"name": "Odometer", "value": 100.0, "date": "2021-01-01T00:00:00Z"},
                {"name": "Odometer", "value": 105.5, "date": "2021-01-02T00:00:00Z"},
                {"name": "FuelLevel", "value": 40.0, "date": "2021-01-03T00:00:00Z"}
            ]
        }))
        .unwrap();
        assert_eq!(status.signal("Odometer").and_then(|s| s.value), Some(105.5));
        assert!(status.signal("EngineSpeed").is_none());
        assert!(status.location.is_none());
    }

    #[test]
    fn pairing_request_uses_wire_names() {
        let body = PairingRequest::new("XEE-123", "0000");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"deviceId": "XEE-123", "devicePin": "0000"})
        );
    }
}
