//! メール/パスワードでのアカウント作成

use super::{rejection, transport, BackendClient};
use async_trait::async_trait;
use pet_signup_common::{AuthService, AuthSession, Credentials, ServiceError};
use reqwest::Method;
use serde_json::Value;

#[async_trait(?Send)]
impl AuthService for BackendClient {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, ServiceError> {
        let response = self
            .request(Method::POST, "auth/v1/signup", None)
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        AuthSession::from_signup_response(&body)
    }
}
