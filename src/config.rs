use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub api_token: Option<String>,
    pub user_id: Option<i64>,
    pub use_mock: bool,
    pub settings_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_base = lookup("LMS_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if api_base.trim().is_empty() {
            anyhow::bail!("LMS_API_BASE is empty");
        }

        let api_token = lookup("LMS_API_TOKEN").filter(|token| !token.is_empty());

        let user_id = match lookup("LMS_USER_ID") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("LMS_USER_ID is not a university id: {:?}", raw))?,
            ),
            _ => None,
        };

        let use_mock = lookup("LMS_USE_MOCK")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let settings_path = lookup("LMS_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("lms-settings.yaml"));
        let log_dir = lookup("LMS_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Config {
            api_base,
            api_token,
            user_id,
            use_mock,
            settings_path,
            log_dir,
        })
    }
}
