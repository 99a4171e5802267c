//! Projection of an API item into a stored metrics record.
use crate::youtube::VideoItem;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One timestamped snapshot of a video's statistics.
///
/// Field order here is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub timestamp: String,
    pub id: String,
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

/// The counter triple used for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl MetricRecord {
    /// Build a record from the first API item and a preformatted timestamp.
    pub fn project(item: &VideoItem, timestamp: String) -> Self {
        let stats = item.statistics.clone().unwrap_or_default();
        let count = |value: &Option<Value>| value.as_ref().map_or(0, coerce_count);
        Self {
            timestamp,
            id: item.id.clone().unwrap_or_default(),
            title: item
                .snippet
                .as_ref()
                .and_then(|snippet| snippet.title.clone())
                .unwrap_or_default(),
            view_count: count(&stats.view_count),
            like_count: count(&stats.like_count),
            comment_count: count(&stats.comment_count),
        }
    }

    pub fn counters(&self) -> Counters {
        Counters {
            views: self.view_count,
            likes: self.like_count,
            comments: self.comment_count,
        }
    }
}

/// Format `now` as local civil time in `tz` with a literal offset suffix.
///
/// The suffix is not checked against the zone's actual offset at `now`.
pub fn format_timestamp(now: DateTime<Utc>, tz: Tz, suffix: &str) -> String {
    let local = now.with_timezone(&tz);
    format!("{}{suffix}", local.format("%Y-%m-%dT%H:%M:%S"))
}

/// Coerce an upstream counter to a non-negative integer, defaulting to 0.
///
/// The API sends counters as decimal strings; plain JSON numbers are
/// accepted as well.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(float_to_count))
            .unwrap_or(0),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return 0;
            }
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_to_count))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_to_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}
