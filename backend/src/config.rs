use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, str::FromStr};

/// Which repository implementation backs the application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// In-process tables; data is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("Invalid STORAGE_BACKEND value: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub ai_api_url: Option<String>,
    pub ai_api_key: Option<String>,
    pub ai_timeout_seconds: u64,
    pub photo_cleanup_interval_seconds: u64,
    pub owner_email: Option<String>,
    pub owner_password: Option<String>,
    pub cors_allow_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/tryon".to_string());

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::default(),
        };

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let ai_api_url = optional_env("AI_API_URL");
        let ai_api_key = optional_env("AI_API_KEY");

        let ai_timeout_seconds = parse_env("AI_TIMEOUT_SECONDS", 60)?;
        let photo_cleanup_interval_seconds = parse_env("PHOTO_CLEANUP_INTERVAL_SECONDS", 0)?;

        let owner_email = optional_env("OWNER_EMAIL").map(|email| email.to_lowercase());
        let owner_password = optional_env("OWNER_PASSWORD");

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let max_upload_bytes = parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        Ok(Config {
            database_url,
            storage_backend,
            jwt_secret,
            upload_dir,
            public_base_url,
            ai_api_url,
            ai_api_key,
            ai_timeout_seconds,
            photo_cleanup_interval_seconds,
            owner_email,
            owner_password,
            cors_allow_origins,
            max_upload_bytes,
        })
    }

    /// True when the external generator can actually be called.
    pub fn generation_enabled(&self) -> bool {
        self.ai_api_url.is_some() && self.ai_api_key.is_some()
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow!("Invalid {} value: {}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_aliases() {
        assert_eq!(
            "Postgres".parse::<StorageBackend>().unwrap(),
            StorageBackend::Postgres
        );
        assert_eq!(
            " memory ".parse::<StorageBackend>().unwrap(),
            StorageBackend::Memory
        );
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn generation_requires_both_url_and_key() {
        let mut config = Config {
            database_url: String::new(),
            storage_backend: StorageBackend::Memory,
            jwt_secret: "secret".into(),
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:3000".into(),
            ai_api_url: Some("http://ai.local/generate".into()),
            ai_api_key: None,
            ai_timeout_seconds: 60,
            photo_cleanup_interval_seconds: 0,
            owner_email: None,
            owner_password: None,
            cors_allow_origins: vec!["*".into()],
            max_upload_bytes: 1024,
        };
        assert!(!config.generation_enabled());
        config.ai_api_key = Some("key".into());
        assert!(config.generation_enabled());
    }
}
