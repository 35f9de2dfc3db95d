use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::info;

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::paginator::paginate;
use crate::ranker::top_n;
use crate::resolver::resolve_uploads_playlist;
use crate::stats::{VideoStat, fetch_stats};
use crate::youtube::VideoApi;

pub const DEFAULT_TOP_N: usize = 10;

/// Resolve uploads -> list recent items -> fetch statistics -> rank.
///
/// Either the complete ranking is returned or an error; nothing partial.
pub struct Pipeline<'a> {
    api: &'a dyn VideoApi,
    cache_path: PathBuf,
    limit: usize,
}

impl<'a> Pipeline<'a> {
    pub fn new(api: &'a dyn VideoApi, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            cache_path: cache_path.into(),
            limit: DEFAULT_TOP_N,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Rank the channel's videos published on or after `since`.
    pub async fn run(&self, channel_id: &str, since: DateTime<Utc>) -> Result<Vec<VideoStat>> {
        let channel_id = channel_id.trim();
        if channel_id.is_empty() {
            return Err(Error::InputMissing);
        }

        let mut cache = Cache::load(&self.cache_path);
        let playlist_id = resolve_uploads_playlist(self.api, channel_id, &mut cache).await?;
        cache.save(&self.cache_path)?;
        info!("Channel {} uploads playlist: {}", channel_id, playlist_id);

        let video_ids = paginate(self.api, &playlist_id, since).await?;
        info!("{} videos published since {}", video_ids.len(), since);

        let stats = fetch_stats(self.api, &video_ids).await?;
        Ok(top_n(&stats, self.limit))
    }
}
