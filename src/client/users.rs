use super::{require_id, XeeClient};
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::User;

impl XeeClient {
    /// `GET /users/me`
    pub async fn user(&self) -> Result<User> {
        self.executor.execute(&ApiRequest::get(&["users", "me"])).await
    }

    /// `PATCH /users/{id}` with the user as JSON.
    pub async fn update_user(&self, user: &User) -> Result<User> {
        let id = require_id(user.id.as_deref(), "user")?;
        let request = ApiRequest::patch(&["users", id]).with_json(user)?;
        self.executor.execute(&request).await
    }
}
