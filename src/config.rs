use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};

use crate::error::{Error, Result};

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Cache file used when `--cache` is not given, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "cache.json";

const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
const API_KEY_SETTING: &str = "YouTubeApiKey";

/// Get the base data directory (~/.yt-top-views/)
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        std::env::var("YT_TOP_VIEWS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".yt-top-views")
            })
    })
}

/// Get the .env file path
pub fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Load environment variables from the data directory's .env file
pub fn load_env() {
    let env_path = env_file_path();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    } else {
        // Try current directory as fallback
        let _ = dotenvy::dotenv();
    }
}

/// Create the data directory if it doesn't exist
pub fn ensure_directories() -> Result<()> {
    fs::create_dir_all(data_dir())?;
    Ok(())
}

/// Get the YouTube Data API key.
///
/// The environment wins; otherwise `appsettings.json` (and its per-environment
/// override) in the working directory is consulted.
pub fn youtube_api_key() -> Option<String> {
    if let Some(key) = std::env::var(API_KEY_ENV).ok().and_then(non_empty) {
        return Some(key);
    }

    let environment =
        std::env::var("ASPNETCORE_ENVIRONMENT").unwrap_or_else(|_| "Production".to_string());
    appsettings_api_key(Path::new("."), &environment)
}

/// Require an API key, failing before any network activity when it is absent.
pub fn require_api_key(key: Option<String>) -> Result<String> {
    key.and_then(non_empty).ok_or(Error::ConfigMissing)
}

/// Read `YouTubeApiKey` from `appsettings.json`, letting
/// `appsettings.<environment>.json` override it.
///
/// An override that is present but blank still wins, leaving no key.
pub fn appsettings_api_key(dir: &Path, environment: &str) -> Option<String> {
    let files = [
        dir.join("appsettings.json"),
        dir.join(format!("appsettings.{}.json", environment)),
    ];

    files
        .iter()
        .filter_map(|path| read_settings_key(path))
        .last()
        .and_then(non_empty)
}

fn read_settings_key(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    debug!("Reading settings from {}", path.display());

    match serde_json::from_str::<HashMap<String, serde_json::Value>>(&content) {
        Ok(settings) => settings
            .get(API_KEY_SETTING)
            .and_then(|v| v.as_str())
            .map(String::from),
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
