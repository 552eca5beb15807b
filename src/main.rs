mod config;
mod server;
mod usage;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use config::Config;
use server::handlers::AppState;
use server::router::create_router;

#[derive(Parser, Debug)]
#[command(
    name = "sessions-dash",
    version,
    about = "Local dashboard for Claude Code token usage and costs"
)]
struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "SESSIONS_DASH_PORT")]
    port: Option<u16>,

    /// Root of the session log tree (defaults to ~/.claude/projects)
    #[arg(long, env = "SESSIONS_DASH_PROJECTS_DIR")]
    projects_dir: Option<PathBuf>,

    /// Open the dashboard in the default browser after startup
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[sessions-dash] failed to load config ({e}), using defaults");
            Config::default()
        }
    };

    let port = cli.port.unwrap_or(config.port);
    let projects_dir = cli
        .projects_dir
        .clone()
        .unwrap_or_else(|| config.resolve_projects_dir());

    let state = Arc::new(AppState {
        projects_dir: projects_dir.clone(),
    });
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let url = format!("http://localhost:{port}");
    eprintln!(
        "{} {}",
        "Sessions Dashboard running on".green(),
        url.bold()
    );
    eprintln!("  scanning {}", projects_dir.display());
    if !projects_dir.is_dir() {
        eprintln!(
            "  {} log tree not found yet; reports will be empty until sessions appear",
            "note:".yellow()
        );
    }

    if cli.open {
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
