//! プロフィール行の挿入

use super::{rejection, transport, BackendClient};
use async_trait::async_trait;
use pet_signup_common::{AuthSession, ProfileRow, ProfileStore, ServiceError};
use reqwest::Method;

#[async_trait(?Send)]
impl ProfileStore for BackendClient {
    async fn insert_profile(&self, session: &AuthSession, row: &ProfileRow) -> Result<(), ServiceError> {
        let path = format!("rest/v1/{}", self.settings.profile_table);
        let response = self
            .request(Method::POST, &path, session.access_token.as_deref())
            .header("prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}
