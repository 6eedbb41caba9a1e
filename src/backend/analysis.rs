//! 画像解析関数の呼び出し

use super::{rejection, transport, BackendClient};
use async_trait::async_trait;
use pet_signup_common::{AnalysisReply, ImageAnalyzer, ImagePayload, PetAnalysis, ServiceError};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

#[async_trait(?Send)]
impl ImageAnalyzer for BackendClient {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisReply, ServiceError> {
        let path = format!("functions/v1/{}", self.settings.analysis_function);
        debug!(%path, image_len = payload.image.len(), "invoking analysis function");

        let response = self
            .request(Method::POST, &path, None)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            // 関数側のエラーは通信失敗と区別して返す
            let message = match rejection(response).await {
                ServiceError::Rejected { message, .. } => message,
                other => other.to_string(),
            };
            return Ok(AnalysisReply::Rejected(message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        Ok(AnalysisReply::Analysis(PetAnalysis::new(body)))
    }
}
