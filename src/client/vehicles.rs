use super::{require_id, XeeClient};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Device, PairingRequest, Status, Vehicle};

impl XeeClient {
    /// Vehicles of `user_id`, or of the signed-in user when `None`.
    pub async fn vehicles(&self, user_id: Option<&str>) -> Result<Vec<Vehicle>> {
        let user_id = match user_id {
            Some(id) => require_id(Some(id), "user")?,
            None => "me",
        };
        self.executor
            .execute(&ApiRequest::get(&["users", user_id, "vehicles"]))
            .await
    }

    pub async fn vehicle(&self, vehicle_id: &str) -> Result<Vehicle> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        self.executor.execute(&ApiRequest::get(&["vehicles", id])).await
    }

    /// `PATCH /vehicles/{id}` with the vehicle as JSON.
    pub async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let id = require_id(vehicle.id.as_deref(), "vehicle")?;
        let request = ApiRequest::patch(&["vehicles", id]).with_json(vehicle)?;
        self.executor.execute(&request).await
    }

    pub async fn vehicle_status(&self, vehicle_id: &str) -> Result<Status> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        self.executor
            .execute(&ApiRequest::get(&["vehicles", id, "status"]))
            .await
    }

    pub async fn device(&self, vehicle_id: &str) -> Result<Device> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        self.executor
            .execute(&ApiRequest::get(&["vehicles", id, "device"]))
            .await
    }

    /// Pair a device with the signed-in user's account. Returns the vehicle
    /// the device is now attached to.
    pub async fn associate_vehicle(&self, device_id: &str, device_pin: &str) -> Result<Vehicle> {
        let device_id = require_id(Some(device_id), "device")?;
        let request = ApiRequest::post(&["users", "me", "vehicles"])
            .with_json(&PairingRequest::new(device_id, device_pin))?;
        self.executor.execute(&request).await
    }
}
