//! YouTube Data API client for the `videos` list endpoint.
//!
//! One blocking GET per run. Non-2xx responses are turned into errors by
//! hand so the response body can be included in the message.
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use ureq::Agent;

/// Resource parts requested from the API.
pub const REQUEST_PARTS: &str = "snippet,statistics";

/// Top-level `videos.list` response; only `items` is consumed.
#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub title: Option<String>,
}

/// Counters arrive as decimal strings and are coerced during projection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub view_count: Option<Value>,
    #[serde(default)]
    pub like_count: Option<Value>,
    #[serde(default)]
    pub comment_count: Option<Value>,
}

/// Client bound to one endpoint, video and key.
pub struct YouTubeClient {
    agent: Agent,
    api_url: String,
    video_id: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: &Config) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            api_url: config.api_url.clone(),
            video_id: config.video_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch the video and return the first result item.
    pub fn fetch_video(&self) -> Result<VideoItem> {
        tracing::debug!(
            url = %self.api_url,
            video_id = %self.video_id,
            part = REQUEST_PARTS,
            "requesting video statistics"
        );
        let start = Instant::now();
        let mut response = self
            .agent
            .get(self.api_url.as_str())
            .query("part", REQUEST_PARTS)
            .query("id", &self.video_id)
            .query("key", &self.api_key)
            .call()
            .with_context(|| format!("request {}", self.api_url))?;
        let status = response.status();
        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "youtube api response"
        );

        if !status.is_success() {
            let body = response.body_mut().read_to_string();
            return Err(api_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                body,
            ));
        }

        let list: VideoListResponse = response
            .body_mut()
            .read_json()
            .context("parse YouTube API response")?;
        first_item(list)
    }
}

/// Build the error for a non-2xx response.
///
/// `reason` is the standard phrase for the code; ureq does not expose the
/// reason text the server sent.
fn api_error<E: fmt::Display>(
    code: u16,
    reason: &str,
    body: std::result::Result<String, E>,
) -> anyhow::Error {
    match body {
        Ok(body) => anyhow!("YouTube API error: {code} {reason}\n{body}"),
        Err(err) => anyhow!("YouTube API error: {code} {reason}\n<failed to read body: {err}>"),
    }
}

/// Take the first item, failing when the result set is empty or absent.
pub fn first_item(list: VideoListResponse) -> Result<VideoItem> {
    list.items
        .and_then(|items| items.into_iter().next())
        .ok_or_else(|| anyhow!("No video found for the provided VIDEO_ID."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: Value) -> VideoListResponse {
        serde_json::from_value(value).expect("video list")
    }

    #[test]
    fn first_item_picks_first_entry() {
        let item = first_item(list(json!({
            "kind": "youtube#videoListResponse",
            "items": [
                { "id": "first", "statistics": { "viewCount": "1" } },
                { "id": "second" }
            ]
        })))
        .expect("item");
        assert_eq!(item.id.as_deref(), Some("first"));
    }

    #[test]
    fn empty_items_is_not_found() {
        let err = first_item(list(json!({ "items": [] }))).unwrap_err();
        assert_eq!(err.to_string(), "No video found for the provided VIDEO_ID.");
    }

    #[test]
    fn absent_items_is_not_found() {
        let err = first_item(list(json!({ "pageInfo": { "totalResults": 0 } }))).unwrap_err();
        assert!(err.to_string().contains("No video found"));
    }

    #[test]
    fn api_error_includes_status_and_body() {
        let err = api_error::<String>(
            403,
            "Forbidden",
            Ok(r#"{"error":{"message":"quotaExceeded"}}"#.to_string()),
        );
        assert_eq!(
            err.to_string(),
            "YouTube API error: 403 Forbidden\n{\"error\":{\"message\":\"quotaExceeded\"}}"
        );
    }

    #[test]
    fn api_error_reports_unreadable_body() {
        let err = api_error(500, "Internal Server Error", Err("connection reset"));
        let message = err.to_string();
        assert!(message.starts_with("YouTube API error: 500 Internal Server Error\n"));
        assert!(message.contains("failed to read body: connection reset"), "{message}");
    }

    #[test]
    fn tolerates_null_snippet_and_statistics() {
        let item = first_item(list(json!({
            "items": [{ "id": "x", "snippet": null, "statistics": null }]
        })))
        .expect("item");
        assert!(item.snippet.is_none());
        assert!(item.statistics.is_none());
    }
}
