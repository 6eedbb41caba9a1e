//! バックエンド連携（fetch）

mod fetch_backend;

pub use fetch_backend::{BackendConfig, FetchBackend};
