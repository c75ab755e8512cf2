//! Process configuration assembled from the environment plus persisted
//! settings. Secrets only ever come from the environment.

use secrecy::SecretString;

use crate::settings::Settings;

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    url: String,
    pub pool_size: usize,
}

impl DatabaseConfig {
    /// Read `GROUNDWORK_DATABASE_URL` (or `DATABASE_URL`) from the
    /// environment. `None` means persistence is not configured, which is
    /// fine for estimate-only usage.
    pub fn from_env(settings: &Settings) -> Option<Self> {
        let url = std::env::var("GROUNDWORK_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()?;
        Some(Self {
            url,
            pool_size: settings.database.pool_size,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Vision API configuration.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_photos: usize,
}

impl VisionConfig {
    /// Key from `OPENAI_API_KEY`, everything else from settings.
    pub fn from_env(settings: &Settings) -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(SecretString::from);
        Self {
            api_key,
            base_url: settings.vision.base_url.clone(),
            model: settings.vision.model.clone(),
            timeout_secs: settings.vision.timeout_secs,
            max_photos: settings.vision.max_photos,
        }
    }
}
