use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "API key is not set. Set YOUTUBE_API_KEY, add YouTubeApiKey to appsettings.json, or run `yt-top-views init`."
    )]
    ConfigMissing,

    #[error("Channel ID is not set. Please provide a valid YouTube channel ID.")]
    InputMissing,

    #[error("Channel not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Cache file is corrupt: {0}")]
    CacheCorrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for any failure of a remote request (status, body, or transport).
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
