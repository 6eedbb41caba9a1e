//! エラー型定義

use serde_json::Value;
use thiserror::Error;

/// 外部サービス呼び出しのエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// 通信失敗（接続不可、タイムアウトなど）
    #[error("通信エラー: {0}")]
    Transport(String),

    /// サービスがリクエストを拒否した
    #[error("サービスエラー{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Rejected { status: Option<u16>, message: String },

    /// レスポンスの形式が想定外
    #[error("レスポンス解析エラー: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// 2xx以外のHTTPレスポンスからエラーを作る
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::rejected(Some(status), error_message(body, status))
    }
}

/// エラーボディからメッセージを取り出す
///
/// キーはサービスごとに異なる: msg / error_description / message / error
fn error_message(body: &str, status: u16) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "error_description", "message", "error"] {
            match map.get(key) {
                Some(Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(s)) = inner.get("message") {
                        return s.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.chars().take(200).collect()
    }
}

/// サインアップ処理のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignupError {
    #[error("アカウント作成に失敗: {0}")]
    Registration(#[source] ServiceError),

    #[error("プロフィール保存に失敗: {0}")]
    ProfileInsert(#[source] ServiceError),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, SignupError>;
