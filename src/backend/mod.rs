//! マネージドバックエンド連携モジュール
//!
//! 認証(/auth/v1)・ストレージ(/storage/v1)・DB(/rest/v1)・解析関数(/functions/v1)
//! をHTTPで呼び出し、共通ライブラリのポートを実装する。

mod analysis;
mod auth;
mod rest;
mod storage;

use crate::config::Config;
use crate::error::{PetSignupError, Result};
use pet_signup_common::ServiceError;
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;

/// バックエンド上のリソース名
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub analysis_function: String,
    pub image_bucket: String,
    pub profile_table: String,
}

impl From<&Config> for BackendSettings {
    fn from(config: &Config) -> Self {
        Self {
            analysis_function: config.analysis_function.clone(),
            image_bucket: config.image_bucket.clone(),
            profile_table: config.profile_table.clone(),
        }
    }
}

/// HTTPクライアント
///
/// 4つのポートすべてを実装するので、サービスごとにcloneして渡す
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        timeout: Duration,
        settings: BackendSettings,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PetSignupError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            settings,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (url, key) = config.backend()?;
        Self::new(
            &url,
            &key,
            Duration::from_secs(config.timeout_seconds),
            BackendSettings::from(config),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// 共通ヘッダ付きのリクエスト
    ///
    /// セッションのトークンがなければanonキーで認可する
    fn request(&self, method: Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let token = bearer.unwrap_or(&self.anon_key);
        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

/// 2xx以外のレスポンスをエラーに変換
async fn rejection(response: Response) -> ServiceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ServiceError::from_response(status, &body)
}
