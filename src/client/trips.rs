use super::{require_id, XeeClient};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Location, Signal, Trip};

impl XeeClient {
    pub async fn trips(&self, vehicle_id: &str) -> Result<Vec<Trip>> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        self.executor
            .execute(&ApiRequest::get(&["vehicles", id, "trips"]))
            .await
    }

    pub async fn trip(&self, trip_id: &str) -> Result<Trip> {
        let id = require_id(Some(trip_id), "trip")?;
        self.executor.execute(&ApiRequest::get(&["trips", id])).await
    }

    /// Sensor readings recorded during a trip. The API usually answers with
    /// a redirect to a storage host.
    pub async fn signals(&self, trip_id: &str) -> Result<Vec<Signal>> {
        let id = require_id(Some(trip_id), "trip")?;
        self.executor
            .execute(&ApiRequest::get(&["trips", id, "signals"]))
            .await
    }

    pub async fn locations(&self, trip_id: &str) -> Result<Vec<Location>> {
        let id = require_id(Some(trip_id), "trip")?;
        self.executor
            .execute(&ApiRequest::get(&["trips", id, "locations"]))
            .await
    }
}
