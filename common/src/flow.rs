//! サインアップウィザード
//!
//! Step1: 写真選択 -> 画像解析
//! Step2: プロフィール入力 -> アカウント作成 -> 画像アップロード -> プロフィール保存
//!
//! 各呼び出しは順番にawaitするだけで、リトライや補償処理は行わない。
//! アカウント作成後にプロフィール保存が失敗した場合もアカウントは残る。

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::analysis::AnalysisReply;
use crate::data_url::extension_for_mime;
use crate::error::{Result, SignupError};
use crate::form::ProfileForm;
use crate::ports::{AuthService, ImageAnalyzer, Navigator, Notifier, ObjectStorage, ProfileStore};
use crate::types::{
    AuthSession, Credentials, ImagePayload, Notice, ProfileRow, SelectedImage, SignupState,
    SignupStep,
};

/// 登録完了後の遷移先
pub const DEFAULT_REDIRECT_PATH: &str = "/dashboard";

/// ウィザードが使う外部サービス一式
pub struct SignupServices {
    pub analyzer: Box<dyn ImageAnalyzer>,
    pub auth: Box<dyn AuthService>,
    pub storage: Box<dyn ObjectStorage>,
    pub profiles: Box<dyn ProfileStore>,
    pub notifier: Box<dyn Notifier>,
    pub navigator: Box<dyn Navigator>,
}

#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub redirect_path: String,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
        }
    }
}

/// 画像解析の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    /// 解析成功、Step2へ進んだ
    Analyzed,
    /// サービスがエラーを返した、Step1に留まる
    Rejected,
    /// 通信失敗、解析なしでStep2へ進んだ
    Degraded,
    /// 画像が未選択
    NoImage,
}

/// サインアップウィザード
pub struct SignupFlow {
    services: SignupServices,
    options: FlowOptions,
    state: SignupState,
}

impl SignupFlow {
    pub fn new(services: SignupServices, options: FlowOptions) -> Self {
        Self {
            services,
            options,
            state: SignupState::default(),
        }
    }

    pub fn state(&self) -> &SignupState {
        &self.state
    }

    /// 画像を選択（Noneでクリア）
    pub fn set_image(&mut self, image: Option<SelectedImage>) {
        match image {
            Some(image) => {
                debug!(file_name = %image.file_name, bytes = image.bytes.len(), "image selected");
                self.state.preview = Some(image.to_data_url());
                self.state.image = Some(image);
            }
            None => {
                self.state.preview = None;
                self.state.image = None;
            }
        }
    }

    /// 選択画像を解析サービスへ送信
    pub async fn analyze_image(&mut self) -> AnalyzeOutcome {
        let Some(preview) = self.state.preview.clone() else {
            self.notify(Notice::error("画像が未選択です", "先にペットの写真を選択してください"));
            return AnalyzeOutcome::NoImage;
        };

        self.state.is_analyzing = true;
        let reply = self
            .services
            .analyzer
            .analyze(&ImagePayload { image: preview })
            .await;
        self.state.is_analyzing = false;

        match reply {
            Ok(AnalysisReply::Analysis(analysis)) => {
                if let Some(message) = analysis.error_marker() {
                    warn!(%message, "analysis returned an error marker");
                    self.state.analysis = None;
                    self.notify(Notice::error("解析に失敗しました", message));
                    return AnalyzeOutcome::Rejected;
                }
                info!("analysis completed");
                self.state.analysis = Some(analysis);
                self.state.step = SignupStep::Details;
                self.notify(Notice::success("解析完了", "解析結果をフォームに反映しました"));
                AnalyzeOutcome::Analyzed
            }
            Ok(AnalysisReply::Rejected(message)) => {
                warn!(%message, "analysis service rejected the image");
                self.state.analysis = None;
                self.notify(Notice::error("解析に失敗しました", message));
                AnalyzeOutcome::Rejected
            }
            Err(e) => {
                warn!(error = %e, "analysis request failed, continuing without analysis");
                self.notify(Notice::error(
                    "解析に失敗しました",
                    format!("{}。手動で入力してください", e),
                ));
                self.state.analysis = None;
                self.state.step = SignupStep::Details;
                AnalyzeOutcome::Degraded
            }
        }
    }

    /// 解析結果で補完したフォーム
    pub fn prefilled_form(&self) -> ProfileForm {
        self.state
            .analysis
            .as_ref()
            .map(ProfileForm::from_analysis)
            .unwrap_or_default()
    }

    /// アカウント作成からプロフィール保存までを実行
    pub async fn create_profile(
        &mut self,
        credentials: &Credentials,
        form: &ProfileForm,
    ) -> Result<ProfileRow> {
        self.state.is_submitting = true;
        let result = self.submit(credentials, form).await;
        self.state.is_submitting = false;

        match result {
            Ok(row) => {
                info!(user_id = %row.user_id, "profile created");
                self.notify(Notice::success("登録完了", "プロフィールを作成しました"));
                self.services.navigator.navigate(&self.options.redirect_path);
                Ok(row)
            }
            Err(e) => {
                warn!(error = %e, "signup failed");
                self.notify(Notice::error("登録に失敗しました", e.to_string()));
                Err(e)
            }
        }
    }

    /// Step1へ戻る（画像と解析結果は保持）
    pub fn go_back(&mut self) {
        self.state.step = SignupStep::Photo;
    }

    async fn submit(&self, credentials: &Credentials, form: &ProfileForm) -> Result<ProfileRow> {
        let session = self
            .services
            .auth
            .sign_up(credentials)
            .await
            .map_err(SignupError::Registration)?;
        info!(user_id = %session.user_id, "account registered");

        let image_url = self.upload_image(&session).await;

        let row = form.to_row(&session.user_id, image_url, self.state.analysis.as_ref());
        self.services
            .profiles
            .insert_profile(&session, &row)
            .await
            .map_err(SignupError::ProfileInsert)?;
        Ok(row)
    }

    /// 画像アップロード（失敗しても登録は続行）
    async fn upload_image(&self, session: &AuthSession) -> Option<String> {
        let image = self.state.image.as_ref()?;
        let path = storage_path(&session.user_id, &image.mime_type, Utc::now().timestamp_millis());

        let uploaded = self
            .services
            .storage
            .upload(session, &path, &image.bytes, &image.mime_type)
            .await;

        match uploaded {
            Ok(()) => Some(self.services.storage.public_url(&path)),
            Err(e) => {
                warn!(error = %e, %path, "image upload failed, saving profile without image");
                None
            }
        }
    }

    fn notify(&self, notice: Notice) {
        self.services.notifier.notify(notice);
    }
}

/// ストレージ上の保存パス: `<user_id>/<unix_millis>.<ext>`
pub fn storage_path(user_id: &str, mime_type: &str, timestamp_millis: i64) -> String {
    format!("{}/{}.{}", user_id, timestamp_millis, extension_for_mime(mime_type))
}
