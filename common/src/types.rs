//! サインアップの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - SignupState: ウィザードの状態（ステップ、選択画像、解析結果）
//! - Credentials / AuthSession: 認証サービスとのやり取り
//! - Notice: 利用者への通知

use crate::analysis::PetAnalysis;
use crate::data_url::to_data_url;
use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ウィザードのステップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignupStep {
    /// Step1: 写真の選択と解析
    #[default]
    Photo,
    /// Step2: プロフィール入力
    Details,
}

impl SignupStep {
    pub fn number(&self) -> u8 {
        match self {
            SignupStep::Photo => 1,
            SignupStep::Details => 2,
        }
    }
}

/// 選択された画像
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// プレビュー用のData URL
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.bytes)
    }
}

/// 解析サービスへ送る画像
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    /// Data URL形式の画像
    pub image: String,
}

/// ウィザードの状態
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupState {
    pub step: SignupStep,
    pub image: Option<SelectedImage>,
    pub preview: Option<String>,
    pub analysis: Option<PetAnalysis>,
    pub is_analyzing: bool,
    pub is_submitting: bool,
}

/// 認証情報
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 登録直後のアカウント
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user_id: String,
    pub email: Option<String>,
    /// メール確認が有効な場合は発行されない
    pub access_token: Option<String>,
}

impl AuthSession {
    /// サインアップ応答からセッションを取り出す
    ///
    /// メール確認が有効な場合はユーザーオブジェクトのみ、
    /// 無効な場合は `user` とトークンを含むセッションが返る
    pub fn from_signup_response(body: &Value) -> Result<Self, ServiceError> {
        let user = body.get("user").filter(|u| u.is_object()).unwrap_or(body);

        let user_id = user
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::Decode("ユーザーIDがありません".into()))?;

        Ok(Self {
            user_id: user_id.to_string(),
            email: user.get("email").and_then(Value::as_str).map(str::to_string),
            access_token: body
                .get("access_token")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// 通知レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// 利用者への通知（トースト）
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, title, message)
    }

    fn with_level(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// プロフィールテーブルへ挿入する行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub user_id: String,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub weight: String,
    pub gender: String,
    pub size: String,
    pub coat: String,
    pub energy_level: String,
    pub temperament: String,
    pub image_url: Option<String>,
    pub analysis: Option<serde_json::Value>,
}
