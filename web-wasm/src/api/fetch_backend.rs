//! fetch APIによるバックエンド呼び出し
//!
//! CLI版と同じエンドポイントを叩く:
//! /functions/v1, /auth/v1/signup, /storage/v1/object, /rest/v1

use async_trait::async_trait;
use js_sys::Uint8Array;
use pet_signup_common::{
    AnalysisReply, AuthService, AuthSession, Credentials, ImageAnalyzer, ImagePayload,
    ObjectStorage, PetAnalysis, ProfileRow, ProfileStore, ServiceError,
};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ビルド時に埋め込む接続先
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub anon_key: String,
    pub analysis_function: String,
    pub image_bucket: String,
    pub profile_table: String,
}

impl BackendConfig {
    pub fn from_build_env() -> Self {
        Self {
            base_url: option_env!("PET_SIGNUP_URL")
                .unwrap_or("http://localhost:54321")
                .trim_end_matches('/')
                .to_string(),
            anon_key: option_env!("PET_SIGNUP_ANON_KEY").unwrap_or_default().to_string(),
            analysis_function: "analyze-pet".to_string(),
            image_bucket: "pet-images".to_string(),
            profile_table: "pets".to_string(),
        }
    }
}

/// リクエストボディ
enum Body<'a> {
    Json(String),
    Bytes(&'a [u8]),
}

#[derive(Clone)]
pub struct FetchBackend {
    config: BackendConfig,
}

impl FetchBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// POSTしてステータスとボディ文字列を返す
    async fn post(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: Body<'_>,
        headers: &[(&str, &str)],
    ) -> Result<(u16, String), ServiceError> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);

        let content_type = match &body {
            Body::Json(json) => {
                opts.set_body(&JsValue::from_str(json));
                Some("application/json")
            }
            Body::Bytes(bytes) => {
                opts.set_body(&Uint8Array::from(*bytes).into());
                None
            }
        };

        let request = Request::new_with_str_and_init(&self.endpoint(path), &opts).map_err(js_transport)?;
        let request_headers = request.headers();
        request_headers.set("apikey", &self.config.anon_key).map_err(js_transport)?;
        request_headers
            .set("Authorization", &format!("Bearer {}", bearer.unwrap_or(&self.config.anon_key)))
            .map_err(js_transport)?;
        if let Some(content_type) = content_type {
            request_headers.set("Content-Type", content_type).map_err(js_transport)?;
        }
        for (name, value) in headers {
            request_headers.set(name, value).map_err(js_transport)?;
        }

        let window = web_sys::window().ok_or_else(|| ServiceError::Transport("windowがありません".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_transport)?;
        let resp: Response = resp_value.dyn_into().map_err(js_transport)?;

        let text = JsFuture::from(resp.text().map_err(js_transport)?)
            .await
            .map_err(js_transport)?
            .as_string()
            .unwrap_or_default();

        Ok((resp.status(), text))
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<(u16, String), ServiceError> {
        let json = serde_json::to_string(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
        self.post(path, bearer, Body::Json(json), headers).await
    }
}

fn js_transport(e: JsValue) -> ServiceError {
    ServiceError::Transport(format!("{:?}", e))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn parse_json(text: &str) -> Result<Value, ServiceError> {
    serde_json::from_str(text).map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl ImageAnalyzer for FetchBackend {
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisReply, ServiceError> {
        let path = format!("functions/v1/{}", self.config.analysis_function);
        let (status, text) = self.post_json(&path, None, payload, &[]).await?;

        if !is_success(status) {
            let message = match ServiceError::from_response(status, &text) {
                ServiceError::Rejected { message, .. } => message,
                other => other.to_string(),
            };
            return Ok(AnalysisReply::Rejected(message));
        }

        Ok(AnalysisReply::Analysis(PetAnalysis::new(parse_json(&text)?)))
    }
}

#[async_trait(?Send)]
impl AuthService for FetchBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, ServiceError> {
        let (status, text) = self.post_json("auth/v1/signup", None, credentials, &[]).await?;
        if !is_success(status) {
            return Err(ServiceError::from_response(status, &text));
        }
        AuthSession::from_signup_response(&parse_json(&text)?)
    }
}

#[async_trait(?Send)]
impl ObjectStorage for FetchBackend {
    async fn upload(
        &self,
        session: &AuthSession,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError> {
        let object_path = format!("storage/v1/object/{}/{}", self.config.image_bucket, path);
        let (status, text) = self
            .post(
                &object_path,
                session.access_token.as_deref(),
                Body::Bytes(bytes),
                &[("Content-Type", content_type), ("x-upsert", "false")],
            )
            .await?;

        if !is_success(status) {
            return Err(ServiceError::from_response(status, &text));
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.endpoint(&format!("storage/v1/object/public/{}/{}", self.config.image_bucket, path))
    }
}

#[async_trait(?Send)]
impl ProfileStore for FetchBackend {
    async fn insert_profile(&self, session: &AuthSession, row: &ProfileRow) -> Result<(), ServiceError> {
        let path = format!("rest/v1/{}", self.config.profile_table);
        let (status, text) = self
            .post_json(&path, session.access_token.as_deref(), row, &[("Prefer", "return=minimal")])
            .await?;

        if !is_success(status) {
            return Err(ServiceError::from_response(status, &text));
        }
        Ok(())
    }
}
