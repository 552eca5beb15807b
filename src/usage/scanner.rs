use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};
use serde_json::Value;

use super::pricing::{calculate_cost, round2, round4};
use super::types::*;

/// Aggregate token usage over the trailing `days` window.
///
/// Total over any state of the log tree: a missing root, unreadable
/// files and malformed lines all degrade to "no data", never an error.
pub fn compute_usage(projects_dir: &Path, days: u32) -> UsageReport {
    compute_usage_with_offset(projects_dir, days, 0)
}

/// Same aggregation over a window shifted back by `offset_days`:
/// `[now - days - offset, now - offset)`. Offset 0 is the plain
/// trailing window.
pub fn compute_usage_with_offset(projects_dir: &Path, days: u32, offset_days: u32) -> UsageReport {
    let upper = Local::now() - Duration::days(offset_days as i64);
    let cutoff = upper - Duration::days(days as i64);
    let cutoff_str = cutoff.format("%Y-%m-%d").to_string();
    let upper_str = upper.format("%Y-%m-%d").to_string();

    let mut by_model: HashMap<String, UsageTally> = HashMap::new();
    let mut by_day: HashMap<String, HashMap<String, UsageTally>> = HashMap::new();
    let mut sessions_by_day: HashMap<String, usize> = HashMap::new();

    for (_, file) in session_files(projects_dir) {
        let Some(mtime) = modified_time(&file) else {
            continue;
        };
        if mtime < cutoff || (offset_days > 0 && mtime > upper) {
            continue;
        }
        let session_day = mtime.format("%Y-%m-%d").to_string();
        *sessions_by_day.entry(session_day.clone()).or_insert(0) += 1;

        let Ok(f) = fs::File::open(&file) else {
            continue;
        };
        for line in BufReader::new(f).lines() {
            let Ok(line) = line else {
                break;
            };
            let line = line.trim();
            // Cheap pre-check before paying for a full JSON parse.
            if line.is_empty() || !line.contains("\"usage\"") {
                continue;
            }
            let Ok(entry) = serde_json::from_str::<Value>(line) else {
                continue;
            };

            // ISO-8601 timestamps order lexicographically by date, so a
            // string compare on the date prefix is enough.
            // The upper bound only exists for shifted windows; the
            // plain window keeps records dated ahead of the local date
            // (UTC log timestamps run ahead of local evenings).
            let ts = entry.get("timestamp").and_then(|v| v.as_str()).unwrap_or("");
            let ts_date = ts.get(..10).unwrap_or(ts);
            if !ts.is_empty()
                && (ts_date < cutoff_str.as_str()
                    || (offset_days > 0 && ts_date > upper_str.as_str()))
            {
                continue;
            }

            let Some((model, tally)) = usage_from_record(&entry) else {
                continue;
            };
            let day = if ts.is_empty() {
                session_day.clone()
            } else {
                ts_date.to_string()
            };
            by_model.entry(model.to_string()).or_default().add(&tally);
            by_day
                .entry(day)
                .or_default()
                .entry(model.to_string())
                .or_default()
                .add(&tally);
        }
    }

    let by_model = finalize_models(by_model);

    let mut by_day: Vec<DayBucket> = by_day
        .into_iter()
        .filter_map(|(date, models)| {
            let models = finalize_models(models);
            if models.is_empty() {
                return None;
            }
            let sessions = sessions_by_day.get(&date).copied().unwrap_or(0);
            Some(DayBucket {
                date,
                models,
                sessions,
            })
        })
        .collect();
    by_day.sort_by(|a, b| b.date.cmp(&a.date));

    let total_estimated_cost = round2(by_model.values().map(|u| u.estimated_cost).sum());
    let total_sessions: usize = sessions_by_day.values().sum();

    UsageReport {
        by_model,
        by_day,
        total_estimated_cost,
        total_sessions,
        days,
    }
}

/// Compare the current window against the immediately-preceding one.
pub fn compute_usage_comparison(projects_dir: &Path, days: u32) -> ComparisonReport {
    let current = compute_usage(projects_dir, days);
    let previous = compute_usage_with_offset(projects_dir, days, days);

    let change_percent = if previous.total_estimated_cost > 0.0 {
        round2(
            (current.total_estimated_cost - previous.total_estimated_cost)
                / previous.total_estimated_cost
                * 100.0,
        )
    } else {
        0.0
    };

    ComparisonReport {
        current_cost: current.total_estimated_cost,
        previous_cost: previous.total_estimated_cost,
        change_percent,
        days,
    }
}

/// Pull the (model, token counts) pair out of a parsed log record.
///
/// Returns `None` for records without a usage payload and for synthetic
/// placeholder models (ids starting with `<`). Absent counters read as
/// zero.
pub(crate) fn usage_from_record(entry: &Value) -> Option<(&str, UsageTally)> {
    let msg = entry.get("message")?.as_object()?;
    let usage = msg.get("usage")?.as_object()?;

    let model = entry
        .get("model")
        .and_then(|v| v.as_str())
        .filter(|m| !m.is_empty())
        .or_else(|| msg.get("model").and_then(|v| v.as_str()))
        .unwrap_or("unknown");
    if model.starts_with('<') {
        return None;
    }

    let count = |key: &str| usage.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
    Some((
        model,
        UsageTally {
            input: count("input_tokens"),
            output: count("output_tokens"),
            cache_read: count("cache_read_input_tokens"),
            cache_write: count("cache_creation_input_tokens"),
        },
    ))
}

/// Drop zero input+output buckets, then attach costs.
fn finalize_models(models: HashMap<String, UsageTally>) -> BTreeMap<String, ModelUsage> {
    models
        .into_iter()
        .filter(|(_, tokens)| tokens.message_total() > 0)
        .map(|(model, tokens)| {
            let estimated_cost = round4(calculate_cost(&model, &tokens));
            (model, ModelUsage {
                tokens,
                estimated_cost,
            })
        })
        .collect()
}

/// Enumerate `<projects_dir>/<project folder>/*.jsonl`, one file per
/// session, paired with the (still encoded) project folder name.
pub(crate) fn session_files(projects_dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files = Vec::new();
    let Ok(entries) = fs::read_dir(projects_dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let Some(folder) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let Ok(children) = fs::read_dir(&dir) else {
            continue;
        };
        for child in children.flatten() {
            let path = child.path();
            if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                files.push((folder.clone(), path));
            }
        }
    }
    files
}

pub(crate) fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    Some(modified.into())
}
