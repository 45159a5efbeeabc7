use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a workable local default, so a bare `cargo run`
/// starts against a backend on the conventional port.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend service hosting the document folders and
    /// the LaTeX toolchain endpoints.
    pub backend_url: String,
    /// Location of the local draft-recovery cache file.
    pub cache_path: PathBuf,
    /// Display label for the dedicated workspace group in the file browser.
    pub workspace_label: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: env_or("BACKEND_URL", "http://127.0.0.1:5000"),
            cache_path: PathBuf::from(env_or("CACHE_PATH", ".editor/state.json")),
            workspace_label: env_or("WORKSPACE_LABEL", "Workspace"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
