//! Append-only metrics log persisted as a single JSON array.
//!
//! Entries are held as raw JSON values so a rewrite never drops or reorders
//! fields of entries this binary did not produce. A missing or malformed
//! file is treated as an empty log.
use crate::record::{Counters, MetricRecord};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Result of offering a new record to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was appended (and written, unless in dry-run).
    Appended,
    /// Counters match the last entry; nothing changed.
    Unchanged,
}

/// Ordered history of metric snapshots, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricLog {
    entries: Vec<Value>,
}

impl MetricLog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the last entry carries exactly these three counters.
    ///
    /// A stored counter only matches when it is a JSON number; `"100"`
    /// does not equal `100`.
    pub fn last_matches(&self, counters: Counters) -> bool {
        let Some(last) = self.entries.last() else {
            return false;
        };
        counter_eq(last, "viewCount", counters.views)
            && counter_eq(last, "likeCount", counters.likes)
            && counter_eq(last, "commentCount", counters.comments)
    }

    /// Append `record` unless its counters equal the last entry's.
    pub fn append_if_changed(&mut self, record: &MetricRecord) -> Result<AppendOutcome> {
        if self.last_matches(record.counters()) {
            return Ok(AppendOutcome::Unchanged);
        }
        let value = serde_json::to_value(record).context("serialize metric record")?;
        self.entries.push(value);
        Ok(AppendOutcome::Appended)
    }
}

fn counter_eq(entry: &Value, field: &str, expected: u64) -> bool {
    match entry.get(field) {
        Some(Value::Number(stored)) if stored.is_f64() => {
            stored.as_f64().is_some_and(|stored| stored == expected as f64)
        }
        Some(Value::Number(stored)) => stored.as_u64() == Some(expected),
        _ => false,
    }
}

/// Create any missing ancestors of `path`.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Load the log from disk, recovering to an empty log on any problem.
pub fn load_log(path: &Path) -> MetricLog {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no existing log; starting empty");
        return MetricLog::default();
    }
    match read_entries(path) {
        Ok(entries) => {
            tracing::debug!(path = %path.display(), entries = entries.len(), "loaded log");
            MetricLog { entries }
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "existing log unusable; starting empty"
            );
            MetricLog::default()
        }
    }
}

fn read_entries(path: &Path) -> Result<Vec<Value>> {
    // Invalid UTF-8 decodes to U+FFFD instead of failing the read.
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let value: Value = serde_json::from_str(&text).context("parse log JSON")?;
    match value {
        Value::Array(entries) => Ok(entries),
        other => anyhow::bail!("log is not a JSON array (found {})", json_kind(&other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Overwrite `path` with the whole log: 2-space pretty JSON plus newline.
pub fn write_log(path: &Path, log: &MetricLog) -> Result<()> {
    let mut text = serde_json::to_string_pretty(&log.entries).context("serialize metrics log")?;
    text.push('\n');
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Offer `record` to the log at `path`, persisting it when counters changed.
///
/// With `dry_run` the directory and file are left untouched.
pub fn record_snapshot(path: &Path, record: &MetricRecord, dry_run: bool) -> Result<AppendOutcome> {
    if !dry_run {
        ensure_parent_dir(path)?;
    }
    let mut log = load_log(path);
    if log.is_empty() {
        tracing::debug!(path = %path.display(), "log has no prior entries");
    }
    let outcome = log.append_if_changed(record)?;
    if outcome == AppendOutcome::Appended && !dry_run {
        write_log(path, &log)?;
        tracing::info!(path = %path.display(), entries = log.len(), "log written");
    }
    Ok(outcome)
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
