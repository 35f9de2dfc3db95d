use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use log::{debug, warn};

use crate::error::Result;
use crate::youtube::{MAX_RESULTS_PER_PAGE, PlaylistItem, VideoApi};

/// Midnight on January 1st of `year` on the local clock, as UTC.
///
/// `None` when `year` is outside chrono's calendar range.
pub fn year_start(year: i32) -> Option<DateTime<Utc>> {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_time(NaiveTime::MIN);

    match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => Some(local.with_timezone(&Utc)),
        None => {
            warn!(
                "Local midnight on {} does not exist, using UTC midnight as the cutoff",
                midnight.date()
            );
            Some(midnight.and_utc())
        }
    }
}

pub fn current_year_start() -> DateTime<Utc> {
    let now = Local::now();
    year_start(now.year()).unwrap_or_else(|| {
        // The current year always fits the calendar; keep the run alive anyway.
        warn!("Cannot compute the start of {}, using now as the cutoff", now.year());
        now.with_timezone(&Utc)
    })
}

/// Walks every page of a playlist, keeping videos published on or after a cutoff.
///
/// Every item of every page is checked: uploads playlists are usually newest
/// first, but that ordering is not guaranteed, so there is no early stop.
pub struct PlaylistPager<'a> {
    api: &'a dyn VideoApi,
    playlist_id: String,
    since: DateTime<Utc>,
    next_page_token: Option<String>,
    pages_fetched: usize,
    exhausted: bool,
}

impl<'a> PlaylistPager<'a> {
    pub fn new(api: &'a dyn VideoApi, playlist_id: &str, since: DateTime<Utc>) -> Self {
        Self {
            api,
            playlist_id: playlist_id.to_string(),
            since,
            next_page_token: None,
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// Fetch the next page and return its in-range video ids in page order.
    /// Returns `None` once the playlist has no further pages.
    pub async fn next_page(&mut self) -> Result<Option<Vec<String>>> {
        if self.exhausted {
            return Ok(None);
        }

        let response = self
            .api
            .list_playlist_items(
                &self.playlist_id,
                self.next_page_token.as_deref(),
                MAX_RESULTS_PER_PAGE,
            )
            .await?;
        self.pages_fetched += 1;

        self.next_page_token = response.next_page_token.filter(|token| !token.is_empty());
        self.exhausted = self.next_page_token.is_none();

        let total = response.items.len();
        let ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| published_since(item, self.since))
            .collect();

        debug!(
            "Page {} of {}: {} of {} items in range",
            self.pages_fetched,
            self.playlist_id,
            ids.len(),
            total
        );
        Ok(Some(ids))
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<String>> {
        let mut video_ids = Vec::new();
        while let Some(ids) = self.next_page().await? {
            video_ids.extend(ids);
        }
        Ok(video_ids)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

/// Ids of every video in `playlist_id` published on or after `since`.
pub async fn paginate(
    api: &dyn VideoApi,
    playlist_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<String>> {
    PlaylistPager::new(api, playlist_id, since).collect_all().await
}

fn published_since(item: PlaylistItem, since: DateTime<Utc>) -> Option<String> {
    let snippet = item.snippet?;
    let video_id = snippet.resource_id.and_then(|r| r.video_id)?;

    match snippet.published_at {
        Some(published_at) if published_at >= since => Some(video_id),
        Some(_) => None,
        None => {
            debug!("Skipping {}: no publish timestamp", video_id);
            None
        }
    }
}
