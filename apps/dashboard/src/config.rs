use std::{collections::HashMap, fs};

use anyhow::{bail, Context, Result};
use url::Url;

/// App settings, lowest to highest precedence: defaults, `dashboard.toml`,
/// environment variables, command-line flags (applied by the caller).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    /// SQLite database for the saved focus; `None` keeps focus in memory.
    pub database_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8001".into(),
            database_url: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("dashboard.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("DASHBOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("DASHBOARD_DATABASE_URL") {
        settings.database_url = Some(v);
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("database_url") {
            settings.database_url = Some(v.clone());
        }
    }
}

pub fn validate_server_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("invalid server url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("unsupported server url scheme '{other}'; expected http or https"),
    }
}
