use std::path::PathBuf;

use anyhow::Result;

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing API key selects the unconfigured insight,
/// a missing data dir falls back to the platform data directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("API_KEY")),
            data_dir: optional_env("LIFTTRACK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "lifttrack", "LiftTrack")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".lifttrack"))
}
