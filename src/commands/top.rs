use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local, Utc};

use crate::config::{require_api_key, youtube_api_key};
use crate::error::{Error, Result};
use crate::paginator::current_year_start;
use crate::pipeline::Pipeline;
use crate::resolver::normalize_channel_input;
use crate::youtube::{VideoApi, YouTubeClient};

pub struct TopOptions {
    pub channel: Option<String>,
    pub limit: usize,
    pub cache: PathBuf,
    pub wait: bool,
}

pub async fn run(options: TopOptions) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    execute(
        options,
        youtube_api_key(),
        current_year_start(),
        &mut input,
        &mut output,
        |api_key| Ok(Box::new(YouTubeClient::new(api_key)?) as Box<dyn VideoApi>),
    )
    .await
}

/// Run `top` against explicit input, output, and API factory.
///
/// `connect` is only called once the API key is known to be present, so a
/// missing key costs no input, no cache access, and no network.
pub async fn execute<R, W, F>(
    options: TopOptions,
    api_key: Option<String>,
    since: DateTime<Utc>,
    input: &mut R,
    output: &mut W,
    connect: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnOnce(&str) -> Result<Box<dyn VideoApi>>,
{
    let api_key = require_api_key(api_key)?;
    let api = connect(&api_key)?;

    let raw = match options.channel {
        Some(channel) => channel,
        None => prompt_channel_id(input, output)?,
    };
    let channel_id = normalize_channel_input(&raw).ok_or(Error::InputMissing)?;

    eprintln!(
        "Fetching the most-viewed videos of {} for channel {}...",
        since.with_timezone(&Local).year(),
        channel_id
    );

    let top = Pipeline::new(api.as_ref(), options.cache)
        .with_limit(options.limit)
        .run(&channel_id, since)
        .await?;

    if top.is_empty() {
        writeln!(output, "No videos published this year.")?;
    }
    for video in &top {
        writeln!(output, "{}", video)?;
    }

    if options.wait {
        wait_for_enter(input, output)?;
    }

    Ok(())
}

fn prompt_channel_id<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "Please enter the YouTube channel ID: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
    writeln!(output, "Press Enter to exit...")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::memory::InMemoryApi;
    use chrono::TimeZone;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn since() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn options(channel: Option<&str>, cache: &Path, wait: bool) -> TopOptions {
        TopOptions {
            channel: channel.map(String::from),
            limit: 10,
            cache: cache.to_path_buf(),
            wait,
        }
    }

    fn channel_with_videos() -> InMemoryApi {
        let published = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        InMemoryApi::new()
            .with_channel("C1", "UP1")
            .with_page("UP1", &[("V1", published), ("V2", published)])
            .with_video("V1", "A", Some(1000))
            .with_video("V2", "B", Some(5000))
    }

    #[tokio::test]
    async fn missing_api_key_stops_before_input_cache_and_network() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        let mut input = Cursor::new(b"C1\n\n".to_vec());
        let mut output: Vec<u8> = Vec::new();
        let mut connected = false;

        for key in [None, Some(String::new()), Some("  ".to_string())] {
            let err = execute(
                options(None, &cache_path, true),
                key,
                since(),
                &mut input,
                &mut output,
                |_| {
                    connected = true;
                    Ok(Box::new(channel_with_videos()) as Box<dyn VideoApi>)
                },
            )
            .await
            .unwrap_err();

            assert!(matches!(err, Error::ConfigMissing));
        }

        assert!(!connected);
        assert_eq!(input.position(), 0);
        assert!(output.is_empty());
        assert!(!cache_path.exists());
    }

    #[tokio::test]
    async fn prompts_for_channel_and_prints_ranking_then_waits() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        let mut input = Cursor::new(b"C1\n\n".to_vec());
        let mut output: Vec<u8> = Vec::new();

        execute(
            options(None, &cache_path, true),
            Some("key".to_string()),
            since(),
            &mut input,
            &mut output,
            |_| Ok(Box::new(channel_with_videos()) as Box<dyn VideoApi>),
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Please enter the YouTube channel ID: \
             B (5000 views) - https://www.youtube.com/watch?v=V2\n\
             A (1000 views) - https://www.youtube.com/watch?v=V1\n\
             Press Enter to exit...\n"
        );
        assert_eq!(input.position(), 4);
        assert_eq!(
            std::fs::read_to_string(&cache_path).unwrap(),
            r#"{"C1":"UP1"}"#
        );
    }

    #[tokio::test]
    async fn no_wait_skips_the_pause() {
        let dir = tempdir().unwrap();
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output: Vec<u8> = Vec::new();

        execute(
            options(Some("C1"), &dir.path().join("cache.json"), false),
            Some("key".to_string()),
            since(),
            &mut input,
            &mut output,
            |_| Ok(Box::new(channel_with_videos()) as Box<dyn VideoApi>),
        )
        .await
        .unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.lines().count(), 2);
        assert!(!printed.contains("Press Enter"));
    }

    #[tokio::test]
    async fn empty_ranking_prints_notice() {
        let dir = tempdir().unwrap();
        let old = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let api = InMemoryApi::new()
            .with_channel("C1", "UP1")
            .with_page("UP1", &[("OLD", old)])
            .with_video("OLD", "Old", Some(10));
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output: Vec<u8> = Vec::new();

        execute(
            options(Some("C1"), &dir.path().join("cache.json"), false),
            Some("key".to_string()),
            since(),
            &mut input,
            &mut output,
            |_| Ok(Box::new(api) as Box<dyn VideoApi>),
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No videos published this year.\n"
        );
    }

    #[tokio::test]
    async fn empty_channel_input_fails_without_waiting() {
        let dir = tempdir().unwrap();
        let cache_path = dir.path().join("cache.json");
        let mut input = Cursor::new(b"\n\n".to_vec());
        let mut output: Vec<u8> = Vec::new();

        let err = execute(
            options(None, &cache_path, true),
            Some("key".to_string()),
            since(),
            &mut input,
            &mut output,
            |_| Ok(Box::new(channel_with_videos()) as Box<dyn VideoApi>),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InputMissing));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Please enter the YouTube channel ID: "
        );
        assert_eq!(input.position(), 1);
        assert!(!cache_path.exists());
    }

    #[tokio::test]
    async fn upstream_failure_prints_nothing_and_does_not_wait() {
        let dir = tempdir().unwrap();
        let api = channel_with_videos().failing_page("UP1", 0);
        let mut input = Cursor::new(b"\n".to_vec());
        let mut output: Vec<u8> = Vec::new();

        let err = execute(
            options(Some("C1"), &dir.path().join("cache.json"), true),
            Some("key".to_string()),
            since(),
            &mut input,
            &mut output,
            |_| Ok(Box::new(api) as Box<dyn VideoApi>),
        )
        .await
        .unwrap_err();

        assert!(err.is_upstream());
        assert!(output.is_empty());
        assert_eq!(input.position(), 0);
    }
}
