//! Error types for the dashboard.
//!
//! Two tiers: [`ConfigError`] is raised while starting up and is fatal,
//! [`FetchError`] is raised during a refresh and only empties the calendar
//! it came from for that cycle.

use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Calendar list file missing or unreadable
    #[error("Cannot read calendar list {}: {source}", path.display())]
    CalendarListRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Calendar list file is not the expected JSON document
    #[error("Invalid calendar list {}: {source}", path.display())]
    CalendarListParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Calendar entry with a blank id
    #[error("Calendar '{0}' has an empty id")]
    EmptyCalendarId(String),

    #[error("Refresh interval must be at least one second")]
    ZeroRefreshInterval,
}

/// Failure fetching one calendar's events.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The calendar backend rejected or failed the request
    #[error("Calendar {calendar_id}: {message}")]
    Backend {
        calendar_id: String,
        message: String,
    },
}

impl FetchError {
    pub fn backend(calendar_id: impl Into<String>, message: impl ToString) -> Self {
        FetchError::Backend {
            calendar_id: calendar_id.into(),
            message: message.to_string(),
        }
    }

    pub fn calendar_id(&self) -> &str {
        match self {
            FetchError::Backend { calendar_id, .. } => calendar_id,
        }
    }
}
