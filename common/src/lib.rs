//! Pet Signup Common Library
//!
//! CLIとWeb(WASM)で共有される型とサインアップウィザード

pub mod analysis;
pub mod data_url;
pub mod error;
pub mod flow;
pub mod form;
pub mod ports;
pub mod types;

pub use analysis::{AnalysisReply, PetAnalysis};
pub use data_url::{
    decode_data_url, extension_for_mime, extract_base64_from_data_url,
    extract_mime_type_from_data_url, to_data_url,
};
pub use error::{Result, ServiceError, SignupError};
pub use flow::{AnalyzeOutcome, FlowOptions, SignupFlow, SignupServices, DEFAULT_REDIRECT_PATH};
pub use form::{ProfileForm, UNKNOWN};
pub use ports::{AuthService, ImageAnalyzer, Navigator, Notifier, ObjectStorage, ProfileStore};
pub use types::{
    AuthSession, Credentials, ImagePayload, Notice, NoticeLevel, ProfileRow, SelectedImage,
    SignupState, SignupStep,
};
