use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Flat channel id -> uploads playlist id store, persisted as a JSON object.
///
/// Entries never expire: a channel's uploads playlist does not change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cache {
    entries: BTreeMap<String, String>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache, falling back to an empty one when the file is missing
    /// or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cache) => cache,
            Err(e) => {
                warn!("{}; starting with an empty cache", e);
                Self::new()
            }
        }
    }

    /// Load the cache, reporting unreadable content as `CacheCorrupt`.
    /// A missing file is an empty cache, not an error.
    pub fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No cache at {}", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::CacheCorrupt(format!("{}: {}", path.display(), e)))?;

        // A literal `null` deserializes to no mapping at all; treat it as empty.
        let entries: Option<BTreeMap<String, String>> = serde_json::from_str(&content)
            .map_err(|e| Error::CacheCorrupt(format!("{}: {}", path.display(), e)))?;

        let cache = Self {
            entries: entries.unwrap_or_default(),
        };
        debug!("Loaded {} cache entries from {}", cache.len(), path.display());
        Ok(cache)
    }

    /// Overwrite `path` with the full mapping via a temp file and rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "cache.json".to_string());
        let tmp_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
        let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, tmp_id));

        fs::write(&tmp_path, serde_json::to_string(&self.entries)?)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!("Saved {} cache entries to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, channel_id: &str) -> Option<&str> {
        self.entries.get(channel_id).map(String::as_str)
    }

    pub fn insert(&mut self, channel_id: impl Into<String>, playlist_id: impl Into<String>) {
        self.entries.insert(channel_id.into(), playlist_id.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
