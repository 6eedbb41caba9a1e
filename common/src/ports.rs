//! 外部サービスのポート
//!
//! 認証・オブジェクトストレージ・DB・画像解析はすべて外部のマネージドサービス。
//! CLIはreqwest、Webはfetchで実装する。WASMのFutureはSendではないため
//! `?Send` で定義している。

use async_trait::async_trait;

use crate::analysis::AnalysisReply;
use crate::error::ServiceError;
use crate::types::{AuthSession, Credentials, ImagePayload, Notice, ProfileRow};

/// 画像解析サービス
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait ImageAnalyzer {
    /// `Err` は通信失敗、サービス側のエラーは `AnalysisReply::Rejected`
    async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisReply, ServiceError>;
}

/// 認証サービス（メール/パスワード）
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait AuthService {
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthSession, ServiceError>;
}

/// オブジェクトストレージ
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait ObjectStorage {
    async fn upload(
        &self,
        session: &AuthSession,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), ServiceError>;

    fn public_url(&self, path: &str) -> String;
}

/// プロフィールテーブル
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait ProfileStore {
    async fn insert_profile(&self, session: &AuthSession, row: &ProfileRow) -> Result<(), ServiceError>;
}

/// 通知（トースト表示など）
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// 画面遷移
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn navigate(&self, path: &str);
}
