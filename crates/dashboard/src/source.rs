//! The calendar backend seen from the snapshot builder.
//!
//! [`SourceEvent`] mirrors the subset of the Google Calendar event resource
//! the dashboard reads, so fixtures can be written as the API's own JSON.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// A start time as the backend reports it: all-day or timed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// Set for all-day events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Set for timed events, with the offset the backend wrote it in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
}

impl EventTime {
    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            date_time: None,
        }
    }

    pub fn timed(date_time: DateTime<FixedOffset>) -> Self {
        Self {
            date: None,
            date_time: Some(date_time),
        }
    }

    /// The calendar date this value names, `date` winning over `date_time`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date
            .or_else(|| self.date_time.as_ref().map(DateTime::date_naive))
    }
}

/// One single-occurrence event returned by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "summary")]
    pub title: String,
    #[serde(default)]
    pub start: Option<EventTime>,
    /// Present on a moved instance of a recurring series
    #[serde(default, rename = "originalStartTime")]
    pub original_start: Option<EventTime>,
}

/// Something that can list a calendar's events for a time range.
///
/// Implementations must exclude deleted events, expand recurring series into
/// single instances and return them ordered by start time.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<SourceEvent>, FetchError>;
}
