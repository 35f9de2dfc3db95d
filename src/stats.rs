use std::fmt;

use log::debug;

use crate::error::Result;
use crate::youtube::{MAX_IDS_PER_REQUEST, Video, VideoApi};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Title and view count of one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStat {
    pub title: String,
    pub view_count: u64,
    pub video_id: String,
}

impl VideoStat {
    pub fn url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.video_id)
    }
}

impl fmt::Display for VideoStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} views) - {}", self.title, self.view_count, self.url())
    }
}

impl From<Video> for VideoStat {
    fn from(video: Video) -> Self {
        Self {
            title: video.snippet.map(|s| s.title).unwrap_or_default(),
            // Hidden or missing statistics count as zero views.
            view_count: video.statistics.and_then(|s| s.view_count).unwrap_or(0),
            video_id: video.id,
        }
    }
}

/// Fetch title and view count for every id, 50 ids per request.
///
/// Any failed batch fails the whole fetch.
pub async fn fetch_stats(api: &dyn VideoApi, video_ids: &[String]) -> Result<Vec<VideoStat>> {
    let mut stats = Vec::with_capacity(video_ids.len());

    for (index, batch) in video_ids.chunks(MAX_IDS_PER_REQUEST).enumerate() {
        debug!("Fetching statistics batch {} ({} ids)", index + 1, batch.len());
        let response = api.list_videos(batch).await?;
        stats.extend(response.items.into_iter().map(VideoStat::from));
    }

    Ok(stats)
}
