use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetSignupError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("接続先が設定されていません。`pet-signup config --set-url URL --set-anon-key KEY` で設定してください")]
    MissingBackend,

    #[error("入力が不足しています: {0}")]
    MissingInput(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です: {0}")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像解析に失敗しました")]
    AnalysisFailed,

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pet_signup_common::SignupError),
}

impl From<dialoguer::Error> for PetSignupError {
    fn from(e: dialoguer::Error) -> Self {
        PetSignupError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PetSignupError>;
