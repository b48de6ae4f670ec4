//! Snapshot model served by the family dashboard.
//!
//! These types are the JSON contract between the dashboard server and the
//! display that polls it. Field names follow the wire format the display
//! already consumes (`memberCalendars`, `dayName`, `eventName`, ...).

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of day buckets in every calendar snapshot.
pub const DAYS_PER_WEEK: usize = 7;

/// Day labels, index 0 is Sunday.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One bucketed calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventId")]
    pub id: String,
    #[serde(rename = "eventName")]
    pub title: String,
    /// Date the event was bucketed under.
    #[serde(rename = "dayKey")]
    pub day_key: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    #[serde(rename = "dayName")]
    pub label: String,
    /// Chronological, in the order the calendar backend returned them.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl DayBucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            events: Vec::new(),
        }
    }
}

/// A single calendar's week, Sunday through Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    #[serde(rename = "memberName")]
    pub calendar_name: String,
    pub days: [DayBucket; DAYS_PER_WEEK],
}

impl CalendarSnapshot {
    /// A calendar with seven labeled, empty buckets.
    pub fn empty(calendar_name: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
            days: WEEKDAY_LABELS.map(DayBucket::new),
        }
    }

    /// Look up a bucket by its label, e.g. `"Wednesday"`.
    pub fn day(&self, label: &str) -> Option<&DayBucket> {
        self.days.iter().find(|d| d.label == label)
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

/// The complete weekly view for every configured calendar.
///
/// Built from scratch on every refresh and never mutated after publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySnapshot {
    /// Sunday that opens the week this snapshot covers.
    #[serde(rename = "weekStart")]
    pub week_start: NaiveDate,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<FixedOffset>,
    /// Same order as the configured calendar list.
    #[serde(rename = "memberCalendars")]
    pub calendars: Vec<CalendarSnapshot>,
}

impl FamilySnapshot {
    pub fn calendar(&self, name: &str) -> Option<&CalendarSnapshot> {
        self.calendars.iter().find(|c| c.calendar_name == name)
    }
}

/// Outcome of the refresh that produced the published snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub generated_at: DateTime<FixedOffset>,
    pub calendars: Vec<CalendarReport>,
}

impl RefreshReport {
    pub fn total_events(&self) -> usize {
        self.calendars.iter().map(|c| c.events).sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.calendars.iter().map(|c| c.dropped).sum()
    }

    pub fn failed_calendars(&self) -> usize {
        self.calendars.iter().filter(|c| c.error.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarReport {
    pub name: String,
    /// Events placed into a day bucket.
    pub events: usize,
    /// Events with no usable day key, or one outside the week.
    pub dropped: usize,
    /// Fetch failure message; the calendar is shown empty for this cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
