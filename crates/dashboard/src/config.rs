use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Runtime settings, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "family-dashboard")]
#[command(about = "Serves this week's events from a set of Google calendars")]
pub struct DashboardConfig {
    /// JSON file listing the calendars to show
    #[arg(long = "calendars", env = "CALENDARS_PATH", default_value = "./calendars.json")]
    pub calendars_path: PathBuf,

    /// Google OAuth client secret (installed application)
    #[arg(long = "client-secret", env = "GOOGLE_CLIENT_SECRET_PATH", default_value = "client_secret.json")]
    pub client_secret_path: PathBuf,

    /// Where the OAuth token is cached between runs
    #[arg(long = "token-cache", env = "GOOGLE_TOKEN_CACHE_PATH", default_value = "token.json")]
    pub token_cache_path: PathBuf,

    /// Directory served under /static
    #[arg(long, env = "STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Stylesheet linked from the HTML view, relative to /static
    #[arg(long, env = "DASHBOARD_STYLESHEET", default_value = "style.css")]
    pub stylesheet: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds between refreshes
    #[arg(long, env = "REFRESH_INTERVAL_SECS", default_value_t = 30)]
    pub refresh_interval_secs: u64,
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(Duration::from_secs(self.refresh_interval_secs))
    }
}

/// One calendar to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Column heading, usually a family member's name
    pub name: String,
    /// Backend calendar id, e.g. an email address
    pub id: String,
}

/// The `calendars.json` document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarList {
    #[serde(default)]
    pub calendars: Vec<CalendarConfig>,
}

impl CalendarList {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CalendarListRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|err| match err {
            ParseFailure::Json(source) => ConfigError::CalendarListParse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(err) => err,
        })
    }

    fn parse(raw: &str) -> Result<Self, ParseFailure> {
        let list: CalendarList = serde_json::from_str(raw).map_err(ParseFailure::Json)?;

        if let Some(blank) = list.calendars.iter().find(|c| c.id.trim().is_empty()) {
            return Err(ParseFailure::Invalid(ConfigError::EmptyCalendarId(
                blank.name.clone(),
            )));
        }

        if list.calendars.is_empty() {
            tracing::warn!("Calendar list is empty, the dashboard will show no calendars");
        }

        Ok(list)
    }
}

enum ParseFailure {
    Json(serde_json::Error),
    Invalid(ConfigError),
}
