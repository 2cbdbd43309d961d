use super::{require_id, XeeClient};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Privacy, PrivacyQuery};

impl XeeClient {
    /// Privacy periods of a vehicle, filtered by `query`.
    pub async fn privacies(&self, vehicle_id: &str, query: &PrivacyQuery) -> Result<Vec<Privacy>> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        let request = query
            .to_query()
            .into_iter()
            .fold(ApiRequest::get(&["vehicles", id, "privacies"]), |request, (key, value)| {
                request.with_query(key, value)
            });
        self.executor.execute(&request).await
    }

    /// Start a privacy period now.
    pub async fn start_privacy(&self, vehicle_id: &str) -> Result<Privacy> {
        let id = require_id(Some(vehicle_id), "vehicle")?;
        self.executor
            .execute(&ApiRequest::post(&["vehicles", id, "privacies"]))
            .await
    }

    /// End a running privacy period.
    pub async fn stop_privacy(&self, privacy_id: &str) -> Result<Privacy> {
        let id = require_id(Some(privacy_id), "privacy")?;
        self.executor.execute(&ApiRequest::put(&["privacies", id])).await
    }
}
