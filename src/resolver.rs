use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::youtube::VideoApi;

/// Normalize user input into a channel id.
///
/// Accepts a bare id or a `youtube.com/channel/<id>` URL. Returns `None`
/// when nothing is left after trimming.
pub fn normalize_channel_input(input: &str) -> Option<String> {
    static CHANNEL_URL: OnceLock<Regex> = OnceLock::new();
    let re = CHANNEL_URL.get_or_init(|| {
        Regex::new(r"(?i)^(?:https?://)?(?:www\.|m\.)?youtube\.com/channel/([A-Za-z0-9_-]+)")
            .expect("channel URL pattern is valid")
    });

    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let channel_id = re
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(input);
    Some(channel_id.to_string())
}

/// Map a channel to its uploads playlist, consulting `cache` first.
///
/// A miss costs one `channels.list` request and inserts the answer into
/// `cache`; persisting the cache is left to the caller.
pub async fn resolve_uploads_playlist(
    api: &dyn VideoApi,
    channel_id: &str,
    cache: &mut Cache,
) -> Result<String> {
    if let Some(playlist_id) = cache.get(channel_id) {
        debug!("Cache hit for {}: {}", channel_id, playlist_id);
        return Ok(playlist_id.to_string());
    }

    debug!("Cache miss for {}, looking up channel", channel_id);
    let response = api.list_channels(channel_id).await?;

    let channel = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(channel_id.to_string()))?;

    let playlist_id = channel
        .content_details
        .and_then(|details| details.related_playlists.uploads)
        .filter(|uploads| !uploads.is_empty())
        .ok_or_else(|| {
            Error::Upstream(format!(
                "channels response for {} has no uploads playlist",
                channel_id
            ))
        })?;

    cache.insert(channel_id, playlist_id.clone());
    Ok(playlist_id)
}
