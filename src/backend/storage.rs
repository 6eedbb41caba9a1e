//! 画像アップロード

use super::{rejection, transport, BackendClient};
use async_trait::async_trait;
use pet_signup_common::{AuthSession, ObjectStorage, ServiceError};
use reqwest::Method;

#[async_trait(?Send)]
impl ObjectStorage for BackendClient {
    async fn upload(
        &self,
        session: &AuthSession,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError> {
        let object_path = format!("storage/v1/object/{}/{}", self.settings.image_bucket, path);
        let response = self
            .request(Method::POST, &object_path, session.access_token.as_deref())
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.endpoint(&format!(
            "storage/v1/object/public/{}/{}",
            self.settings.image_bucket, path
        ))
    }
}
