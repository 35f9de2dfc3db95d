use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

#[doc(hidden)]
pub mod memory;

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page the playlistItems endpoint will return.
pub const MAX_RESULTS_PER_PAGE: u32 = 50;

/// Most video ids the videos endpoint accepts in one request.
pub const MAX_IDS_PER_REQUEST: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub published_at: Option<DateTime<Utc>>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Video {
    pub id: String,
    pub snippet: Option<VideoSnippet>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub view_count: Option<u64>,
}

/// Counts arrive as decimal strings ("1234"), but accept plain numbers too.
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Count::Number(n)) => Ok(Some(n)),
        Some(Count::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The slice of the YouTube Data API v3 this tool consumes.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// `channels.list` with `part=contentDetails`.
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse>;

    /// One page of `playlistItems.list` with `part=snippet`.
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse>;

    /// `videos.list` with `part=snippet,statistics` for up to 50 ids.
    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse>;
}

/// YouTube Data API client authenticated by a static API key
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, YOUTUBE_API_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::ConfigMissing);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}/{} {:?}", self.base_url, endpoint, query);

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "{} failed ({}): {}",
                endpoint, status, text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Upstream(format!("{} returned an unexpected body: {}", endpoint, e))
        })
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse> {
        self.get("channels", &[("part", "contentDetails"), ("id", channel_id)]).await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        self.get("playlistItems", &query).await
    }

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse> {
        let ids = video_ids.join(",");
        self.get("videos", &[("part", "snippet,statistics"), ("id", ids.as_str())]).await
    }
}
