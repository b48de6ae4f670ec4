use chrono::NaiveDate;

use crate::source::SourceEvent;

/// The date an event is bucketed under.
///
/// A moved instance of a recurring series is keyed by the day it was
/// originally scheduled for, so it stays in its usual weekday slot. All
/// other events are keyed by their start. Within each time value an
/// all-day `date` wins over a timed `dateTime`, whose date is taken in the
/// offset the backend reported. Returns `None` when neither is usable.
pub fn extract_day_key(event: &SourceEvent) -> Option<NaiveDate> {
    event
        .original_start
        .as_ref()
        .and_then(|t| t.calendar_date())
        .or_else(|| event.start.as_ref().and_then(|t| t.calendar_date()))
}

/// `YYYY-MM-DD`
pub fn format_day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
