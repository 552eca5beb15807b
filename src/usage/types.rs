use serde::Serialize;
use std::collections::BTreeMap;

/// Token counts for one (model, bucket) pair.
///
/// Field names serialize in the camelCase form the dashboard expects
/// (`cacheRead` / `cacheWrite`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTally {
    pub input: u64,
    pub output: u64,
    pub cache_read: u64,
    pub cache_write: u64,
}

impl UsageTally {
    pub fn add(&mut self, other: &UsageTally) {
        self.input += other.input;
        self.output += other.output;
        self.cache_read += other.cache_read;
        self.cache_write += other.cache_write;
    }

    /// Combined input+output volume. Zero means a pricing-only or
    /// synthetic entry that should not appear in any report.
    pub fn message_total(&self) -> u64 {
        self.input + self.output
    }
}

/// A finalized tally with its estimated cost, computed once after all
/// accumulation for the model is complete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    #[serde(flatten)]
    pub tokens: UsageTally,
    pub estimated_cost: f64,
}

/// Per-day usage rollup: model buckets limited to that day plus the
/// number of session files whose mtime fell on it.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: String,
    pub models: BTreeMap<String, ModelUsage>,
    pub sessions: usize,
}

/// Output of the usage aggregator for one trailing window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub by_model: BTreeMap<String, ModelUsage>,
    pub by_day: Vec<DayBucket>,
    pub total_estimated_cost: f64,
    pub total_sessions: usize,
    pub days: u32,
}

/// Current window vs the immediately-preceding window of equal length.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub current_cost: f64,
    pub previous_cost: f64,
    pub change_percent: f64,
    pub days: u32,
}

/// One row per session log file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub project: String,
    pub date: String,
    pub primary_model: String,
    pub total_input: u64,
    pub total_output: u64,
    pub msg_count: usize,
    pub estimated_cost: f64,
    /// File modification time as epoch seconds; the sort key for rows.
    pub mtime: f64,
}

/// Output of the session summarizer: rows sorted by `mtime` descending,
/// truncated to the requested limit, plus the untruncated count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsReport {
    pub sessions: Vec<SessionSummary>,
    pub total: usize,
    pub days: u32,
}
