use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    Channel, ChannelContentDetails, ChannelListResponse, PlaylistItem, PlaylistItemListResponse,
    PlaylistItemSnippet, RelatedPlaylists, ResourceId, Video, VideoApi, VideoListResponse,
    VideoSnippet, VideoStatistics,
};
use crate::error::{Error, Result};

/// A request observed by [`InMemoryApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Channels(String),
    PlaylistItems {
        playlist_id: String,
        page_token: Option<String>,
        max_results: u32,
    },
    Videos(Vec<String>),
}

/// In-process stand-in for the YouTube Data API that records every call.
///
/// Playlist pages are chained with tokens `page-1`, `page-2`, ... so callers
/// see the same cursor protocol as the real endpoint.
#[derive(Default)]
pub struct InMemoryApi {
    channels: HashMap<String, String>,
    pages: HashMap<String, Vec<Vec<PlaylistItem>>>,
    videos: HashMap<String, Video>,
    failing_pages: HashSet<(String, usize)>,
    failing_videos: bool,
    calls: Mutex<Vec<ApiCall>>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel_id: &str, uploads_playlist_id: &str) -> Self {
        self.channels
            .insert(channel_id.to_string(), uploads_playlist_id.to_string());
        self
    }

    /// Append a page of `(video id, published at)` items to a playlist.
    pub fn with_page(mut self, playlist_id: &str, items: &[(&str, DateTime<Utc>)]) -> Self {
        let page = items
            .iter()
            .map(|(video_id, published_at)| playlist_item(video_id, Some(*published_at)))
            .collect();
        self.pages
            .entry(playlist_id.to_string())
            .or_default()
            .push(page);
        self
    }

    /// Append a page of raw items, for shapes `with_page` cannot express.
    pub fn with_raw_page(mut self, playlist_id: &str, items: Vec<PlaylistItem>) -> Self {
        self.pages
            .entry(playlist_id.to_string())
            .or_default()
            .push(items);
        self
    }

    /// Register a video; `None` views means the platform reports no statistics.
    pub fn with_video(mut self, video_id: &str, title: &str, views: Option<u64>) -> Self {
        let video = Video {
            id: video_id.to_string(),
            snippet: Some(VideoSnippet {
                title: title.to_string(),
            }),
            statistics: views.map(|v| VideoStatistics { view_count: Some(v) }),
        };
        self.videos.insert(video_id.to_string(), video);
        self
    }

    /// Make the zero-based `page_index` of `playlist_id` fail.
    pub fn failing_page(mut self, playlist_id: &str, page_index: usize) -> Self {
        self.failing_pages
            .insert((playlist_id.to_string(), page_index));
        self
    }

    pub fn failing_videos(mut self) -> Self {
        self.failing_videos = true;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn channel_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::Channels(_)))
            .count()
    }

    pub fn playlist_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::PlaylistItems { .. }))
            .count()
    }

    /// The id batches sent to `videos.list`, in request order.
    pub fn video_batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Videos(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

/// Build a playlist item the way `playlistItems.list` returns it.
pub fn playlist_item(video_id: &str, published_at: Option<DateTime<Utc>>) -> PlaylistItem {
    PlaylistItem {
        snippet: Some(PlaylistItemSnippet {
            published_at,
            resource_id: Some(ResourceId {
                video_id: Some(video_id.to_string()),
            }),
        }),
    }
}

fn page_index(page_token: Option<&str>) -> Option<usize> {
    match page_token {
        None => Some(0),
        Some(token) => token.strip_prefix("page-")?.parse().ok(),
    }
}

#[async_trait]
impl VideoApi for InMemoryApi {
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse> {
        self.record(ApiCall::Channels(channel_id.to_string()));

        let items = self
            .channels
            .get(channel_id)
            .map(|uploads| Channel {
                id: channel_id.to_string(),
                content_details: Some(ChannelContentDetails {
                    related_playlists: RelatedPlaylists {
                        uploads: Some(uploads.clone()),
                    },
                }),
            })
            .into_iter()
            .collect();

        Ok(ChannelListResponse { items })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        self.record(ApiCall::PlaylistItems {
            playlist_id: playlist_id.to_string(),
            page_token: page_token.map(String::from),
            max_results,
        });

        let index = page_index(page_token).ok_or_else(|| {
            Error::Upstream(
                "playlistItems failed (400 Bad Request): invalid page token".to_string(),
            )
        })?;
        if self.failing_pages.contains(&(playlist_id.to_string(), index)) {
            return Err(Error::Upstream(format!(
                "playlistItems failed (500 Internal Server Error): page {}",
                index
            )));
        }

        let pages = self.pages.get(playlist_id).map(Vec::as_slice).unwrap_or(&[]);
        let items = pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));

        Ok(PlaylistItemListResponse {
            items,
            next_page_token,
        })
    }

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse> {
        self.record(ApiCall::Videos(video_ids.to_vec()));

        if self.failing_videos {
            return Err(Error::Upstream(
                "videos failed (403 Forbidden): quotaExceeded".to_string(),
            ));
        }

        let items = video_ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect();

        Ok(VideoListResponse { items })
    }
}
