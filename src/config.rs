//! Environment-driven configuration.
//!
//! Everything is resolved up front so a missing variable fails the run
//! before any request goes out.
use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::fmt;
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "YT_API_KEY";
pub const VIDEO_ID_VAR: &str = "VIDEO_ID";
pub const DATA_FILE_VAR: &str = "DATA_FILE";
pub const API_URL_VAR: &str = "YT_API_URL";
pub const TIME_ZONE_VAR: &str = "METRICS_TIME_ZONE";
pub const OFFSET_SUFFIX_VAR: &str = "METRICS_OFFSET_SUFFIX";

pub const DEFAULT_DATA_FILE: &str = "views2.json";
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::America::Santiago;
/// Appended verbatim to every timestamp; not derived from the zone's rules.
pub const DEFAULT_OFFSET_SUFFIX: &str = "-03:00";

/// Resolved settings for one run.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub video_id: String,
    pub data_file: PathBuf,
    pub api_url: String,
    pub time_zone: Tz,
    pub offset_suffix: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset, matching how shells and CI runners
    /// export blank secrets.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let api_key = get(API_KEY_VAR).ok_or_else(|| anyhow!("Missing env {API_KEY_VAR}."))?;
        let video_id = get(VIDEO_ID_VAR).ok_or_else(|| anyhow!("Missing env {VIDEO_ID_VAR}."))?;

        let time_zone = match get(TIME_ZONE_VAR) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|err| anyhow!("invalid {TIME_ZONE_VAR} {name:?}: {err}"))?,
            None => DEFAULT_TIME_ZONE,
        };

        Ok(Self {
            api_key,
            video_id,
            data_file: get(DATA_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            api_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            time_zone,
            offset_suffix: get(OFFSET_SUFFIX_VAR)
                .unwrap_or_else(|| DEFAULT_OFFSET_SUFFIX.to_string()),
        })
    }
}

// Hand-written so the API key never reaches logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("video_id", &self.video_id)
            .field("data_file", &self.data_file)
            .field("api_url", &self.api_url)
            .field("time_zone", &self.time_zone)
            .field("offset_suffix", &self.offset_suffix)
            .finish()
    }
}
