//! Bot behaviour settings loaded from env: cache size, file-session idle timeout, temp dir, top-k.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_CAPACITY: usize = 500;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 900;
pub const DEFAULT_FILE_TEMP_DIR: &str = "temp";
pub const DEFAULT_DOCUMENT_TOP_K: usize = 3;

#[derive(Debug, Clone)]
pub struct BotSettings {
    /// CACHE_CAPACITY: messages kept per channel
    pub cache_capacity: usize,
    /// SESSION_IDLE_SECS: file Q&A session ends after this long without a message
    pub session_idle: Duration,
    /// FILE_TEMP_DIR: where attachments are downloaded before indexing
    pub file_temp_dir: PathBuf,
    /// DOCUMENT_TOP_K: passages retrieved per document question
    pub document_top_k: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            file_temp_dir: PathBuf::from(DEFAULT_FILE_TEMP_DIR),
            document_top_k: DEFAULT_DOCUMENT_TOP_K,
        }
    }
}

impl BotSettings {
    /// Load from environment variables; unset or unparsable values use the defaults.
    pub fn from_env() -> Result<Self> {
        let cache_capacity = env::var("CACHE_CAPACITY")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        let session_idle_secs = env::var("SESSION_IDLE_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_SESSION_IDLE_SECS);
        let file_temp_dir = env::var("FILE_TEMP_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_TEMP_DIR.to_string());
        let document_top_k = env::var("DOCUMENT_TOP_K")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_DOCUMENT_TOP_K);

        let settings = Self {
            cache_capacity,
            session_idle: Duration::from_secs(session_idle_secs),
            file_temp_dir: PathBuf::from(file_temp_dir),
            document_top_k,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            anyhow::bail!("CACHE_CAPACITY must be greater than 0");
        }
        if self.session_idle.is_zero() {
            anyhow::bail!("SESSION_IDLE_SECS must be greater than 0");
        }
        if self.document_top_k == 0 {
            anyhow::bail!("DOCUMENT_TOP_K must be greater than 0");
        }
        Ok(())
    }
}
