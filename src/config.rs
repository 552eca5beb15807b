use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const APP_NAME: &str = "sessions-dash";

pub const DEFAULT_PORT: u16 = 8766;

/// Persisted settings, stored via confy in the platform config dir.
/// CLI flags override whatever is stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    /// Root of the session log tree; `None` means `~/.claude/projects`.
    pub projects_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            projects_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn resolve_projects_dir(&self) -> PathBuf {
        self.projects_dir
            .clone()
            .unwrap_or_else(default_projects_dir)
    }
}

pub fn default_projects_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("projects")
}
