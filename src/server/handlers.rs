use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::usage::scanner::{compute_usage, compute_usage_comparison};
use crate::usage::sessions::compute_sessions;

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_LIMIT: usize = 50;

/// Shared application state
pub struct AppState {
    /// Root of the session log tree, resolved once at startup.
    pub projects_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub days: Option<u32>,
    pub limit: Option<usize>,
}

/// Token usage and cost, grouped by model and by day
pub async fn get_usage(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsageQuery>,
) -> impl IntoResponse {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    Json(compute_usage(&state.projects_dir, days))
}

/// Current window cost vs the preceding window of equal length
pub async fn get_usage_comparison(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsageQuery>,
) -> impl IntoResponse {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    Json(compute_usage_comparison(&state.projects_dir, days))
}

/// Per-session cost breakdown, most recently modified first
pub async fn get_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionsQuery>,
) -> impl IntoResponse {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Json(compute_sessions(&state.projects_dir, days, limit))
}

/// Health check
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
