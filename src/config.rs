use crate::error::{PetSignupError, Result};
use pet_signup_common::DEFAULT_REDIRECT_PATH;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const URL_ENV: &str = "PET_SIGNUP_URL";
const ANON_KEY_ENV: &str = "PET_SIGNUP_ANON_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub anon_key: Option<String>,
    pub analysis_function: String,
    pub image_bucket: String,
    pub profile_table: String,
    pub redirect_path: String,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: None,
            analysis_function: "analyze-pet".into(),
            image_bucket: "pet-images".into(),
            profile_table: "pets".into(),
            redirect_path: DEFAULT_REDIRECT_PATH.into(),
            max_image_size: 1568,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PetSignupError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pet-signup").join("config.json"))
    }

    /// 接続先URLとanonキー
    ///
    /// 環境変数を優先
    pub fn backend(&self) -> Result<(String, String)> {
        let url = non_empty_env(URL_ENV).or_else(|| self.backend_url.clone());
        let key = non_empty_env(ANON_KEY_ENV).or_else(|| self.anon_key.clone());

        match (url, key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Ok((url, key))
            }
            _ => Err(PetSignupError::MissingBackend),
        }
    }

    pub fn set_backend_url(&mut self, url: String) {
        self.backend_url = Some(url.trim_end_matches('/').to_string());
    }

    pub fn set_anon_key(&mut self, key: String) {
        self.anon_key = Some(key);
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis_function, "analyze-pet");
        assert_eq!(config.image_bucket, "pet-images");
        assert_eq!(config.profile_table, "pets");
        assert_eq!(config.redirect_path, "/dashboard");
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn test_set_backend_url_trims_trailing_slash() {
        let mut config = Config::default();
        config.set_backend_url("https://abc.supabase.co/".to_string());
        assert_eq!(config.backend_url.as_deref(), Some("https://abc.supabase.co"));
    }
}
