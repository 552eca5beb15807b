use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{Duration, Local};
use serde_json::Value;

use super::pricing::{calculate_cost, round4};
use super::project_path::decode_project_folder;
use super::scanner::{modified_time, session_files, usage_from_record};
use super::types::*;

/// One summary row per session file modified within the window, most
/// recent first, truncated to `limit`. Sessions with zero retained
/// usage across all models are dropped entirely.
pub fn compute_sessions(projects_dir: &Path, days: u32, limit: usize) -> SessionsReport {
    let cutoff = Local::now() - Duration::days(days as i64);

    // Decode each project folder once, not per session file.
    let mut decoded: HashMap<String, String> = HashMap::new();
    let mut sessions: Vec<SessionSummary> = Vec::new();

    for (folder, path) in session_files(projects_dir) {
        let Some(mtime) = modified_time(&path) else {
            continue;
        };
        if mtime < cutoff {
            continue;
        }
        let Some(session_id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let project = decoded
            .entry(folder.clone())
            .or_insert_with(|| decode_project_folder(&folder))
            .clone();

        let Ok(f) = fs::File::open(&path) else {
            continue;
        };

        let mut by_model: HashMap<String, UsageTally> = HashMap::new();
        let mut first_ts: Option<String> = None;
        let mut last_ts: Option<String> = None;
        let mut msg_count = 0usize;
        // A failed read drops the whole session, not just the rest of
        // the file; a partial row would misreport its totals.
        let mut read_failed = false;

        for line in BufReader::new(f).lines() {
            let Ok(line) = line else {
                read_failed = true;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let has_ts = line.contains("\"timestamp\"");
            let has_usage = line.contains("\"usage\"");
            let has_type = line.contains("\"type\"");
            if !has_ts && !has_usage && !has_type {
                continue;
            }
            let Ok(entry) = serde_json::from_str::<Value>(line) else {
                continue;
            };

            if has_ts {
                if let Some(ts) = entry.get("timestamp").and_then(|v| v.as_str()) {
                    if !ts.is_empty() {
                        if first_ts.is_none() {
                            first_ts = Some(ts.to_string());
                        }
                        last_ts = Some(ts.to_string());
                    }
                }
            }
            if has_type
                && matches!(
                    entry.get("type").and_then(|v| v.as_str()),
                    Some("user") | Some("assistant")
                )
            {
                msg_count += 1;
            }
            if !has_usage {
                continue;
            }
            if let Some((model, tally)) = usage_from_record(&entry) {
                by_model.entry(model.to_string()).or_default().add(&tally);
            }
        }

        if read_failed {
            continue;
        }

        by_model.retain(|_, tokens| tokens.message_total() > 0);
        if by_model.is_empty() {
            continue;
        }

        let total_cost: f64 = by_model
            .iter()
            .map(|(model, tokens)| calculate_cost(model, tokens))
            .sum();
        let total_input: u64 = by_model.values().map(|t| t.input).sum();
        let total_output: u64 = by_model.values().map(|t| t.output).sum();

        // Largest input+output volume wins; on a tie the winner follows
        // map iteration order, which is implementation-defined.
        let primary_model = by_model
            .iter()
            .max_by_key(|(_, tokens)| tokens.message_total())
            .map(|(model, _)| model.clone())
            .unwrap_or_default();

        let date = last_ts
            .or(first_ts)
            .unwrap_or_else(|| mtime.format("%Y-%m-%dT%H:%M:%S").to_string());
        let date = date.get(..10).unwrap_or(&date).to_string();

        sessions.push(SessionSummary {
            session_id: session_id.to_string(),
            project,
            date,
            primary_model,
            total_input,
            total_output,
            msg_count,
            estimated_cost: round4(total_cost),
            mtime: mtime.timestamp_millis() as f64 / 1000.0,
        });
    }

    sessions.sort_by(|a, b| b.mtime.partial_cmp(&a.mtime).unwrap_or(Ordering::Equal));
    let total = sessions.len();
    sessions.truncate(limit);

    SessionsReport {
        sessions,
        total,
        days,
    }
}
