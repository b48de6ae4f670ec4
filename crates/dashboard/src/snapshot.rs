//! Builds the weekly [`FamilySnapshot`] from the configured calendars.

use chrono::{DateTime, TimeZone};
use family_types::{CalendarReport, CalendarSnapshot, Event, FamilySnapshot, RefreshReport};
use futures::future::join_all;

use crate::config::CalendarConfig;
use crate::day_key::{extract_day_key, format_day_key};
use crate::error::FetchError;
use crate::source::{EventSource, SourceEvent};
use crate::week::WeekWindow;

/// A freshly built snapshot together with how the refresh went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub snapshot: FamilySnapshot,
    pub report: RefreshReport,
}

/// Fetch every calendar for the week containing `now` and bucket its events
/// by weekday.
///
/// Never fails: a calendar whose fetch errors is shown empty and the error
/// is recorded in the report.
pub async fn build_snapshot<Tz: TimeZone>(
    calendars: &[CalendarConfig],
    source: &dyn EventSource,
    now: &DateTime<Tz>,
) -> BuildOutcome {
    let window = WeekWindow::containing(now);
    let (time_min, time_max) = (window.start_utc(), window.end_utc());

    let results = join_all(
        calendars
            .iter()
            .map(|calendar| source.list_events(&calendar.id, time_min, time_max)),
    )
    .await;

    let mut snapshots = Vec::with_capacity(calendars.len());
    let mut reports = Vec::with_capacity(calendars.len());

    for (calendar, result) in calendars.iter().zip(results) {
        let (snapshot, report) = assemble_calendar(calendar, result, &window);
        snapshots.push(snapshot);
        reports.push(report);
    }

    let generated_at = now.fixed_offset();
    BuildOutcome {
        snapshot: FamilySnapshot {
            week_start: window.first_day(),
            generated_at,
            calendars: snapshots,
        },
        report: RefreshReport {
            generated_at,
            calendars: reports,
        },
    }
}

fn assemble_calendar<Tz: TimeZone>(
    calendar: &CalendarConfig,
    result: Result<Vec<SourceEvent>, FetchError>,
    window: &WeekWindow<Tz>,
) -> (CalendarSnapshot, CalendarReport) {
    match result {
        Ok(events) => {
            let fetched = events.len();
            let (snapshot, dropped) = bucket_events(&calendar.name, events, window);
            if dropped > 0 {
                tracing::warn!(
                    "Dropped {} of {} events from calendar '{}' with no day in week of {}",
                    dropped,
                    fetched,
                    calendar.name,
                    format_day_key(window.first_day())
                );
            }
            let report = CalendarReport {
                name: calendar.name.clone(),
                events: snapshot.event_count(),
                dropped,
                error: None,
            };
            (snapshot, report)
        }
        Err(e) => {
            tracing::error!("Failed to fetch calendar '{}': {}", calendar.name, e);
            let report = CalendarReport {
                name: calendar.name.clone(),
                events: 0,
                dropped: 0,
                error: Some(e.to_string()),
            };
            (CalendarSnapshot::empty(calendar.name.clone()), report)
        }
    }
}

/// Place each event in the bucket of its day key, keeping fetch order.
///
/// Returns the calendar and the number of events dropped because their day
/// key was missing or fell outside `window`.
pub fn bucket_events<Tz: TimeZone>(
    calendar_name: &str,
    events: Vec<SourceEvent>,
    window: &WeekWindow<Tz>,
) -> (CalendarSnapshot, usize) {
    let mut snapshot = CalendarSnapshot::empty(calendar_name);
    let mut dropped = 0;

    for event in events {
        let Some(day_key) = extract_day_key(&event) else {
            tracing::debug!("Event {} in '{}' has no start date", event.id, calendar_name);
            dropped += 1;
            continue;
        };
        let Some(index) = window.bucket_index(day_key) else {
            tracing::debug!(
                "Event {} in '{}' is keyed to {}, outside the week",
                event.id,
                calendar_name,
                format_day_key(day_key)
            );
            dropped += 1;
            continue;
        };

        snapshot.days[index].events.push(Event {
            id: event.id,
            title: event.title,
            day_key,
        });
    }

    (snapshot, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EventTime;
    use chrono::{NaiveDate, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn all_day(id: &str, day: NaiveDate) -> SourceEvent {
        SourceEvent {
            id: id.to_string(),
            title: format!("title {id}"),
            start: Some(EventTime::all_day(day)),
            original_start: None,
        }
    }

    fn ids(snapshot: &CalendarSnapshot, day: usize) -> Vec<&str> {
        snapshot.days[day].events.iter().map(|e| e.id.as_str()).collect()
    }

    fn window() -> WeekWindow<Utc> {
        WeekWindow::containing(&Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_bucket_events_by_weekday_in_order() {
        let events = vec![
            all_day("a", ymd(2024, 6, 9)),
            all_day("b", ymd(2024, 6, 12)),
            all_day("c", ymd(2024, 6, 12)),
            all_day("d", ymd(2024, 6, 15)),
        ];

        let (snapshot, dropped) = bucket_events("Alice", events, &window());

        assert_eq!(dropped, 0);
        assert_eq!(snapshot.calendar_name, "Alice");
        assert_eq!(ids(&snapshot, 0), vec!["a"]);
        assert_eq!(ids(&snapshot, 3), vec!["b", "c"]);
        assert_eq!(ids(&snapshot, 6), vec!["d"]);
        assert!(ids(&snapshot, 1).is_empty());
        assert_eq!(snapshot.days[3].events[0].day_key, ymd(2024, 6, 12));
    }

    #[test]
    fn test_unkeyed_and_out_of_week_events_are_dropped() {
        let events = vec![
            SourceEvent {
                id: "no-start".to_string(),
                ..Default::default()
            },
            all_day("next-week", ymd(2024, 6, 16)),
            all_day("last-week", ymd(2024, 6, 8)),
            all_day("kept", ymd(2024, 6, 10)),
        ];

        let (snapshot, dropped) = bucket_events("Alice", events, &window());

        assert_eq!(dropped, 3);
        assert_eq!(snapshot.event_count(), 1);
        assert_eq!(snapshot.days[1].events[0].id, "kept");
        // Nothing leaks into Sunday.
        assert!(snapshot.days[0].events.is_empty());
    }

    #[test]
    fn test_moved_instance_stays_on_original_day() {
        let moved = SourceEvent {
            id: "standup_20240611".to_string(),
            title: "Standup".to_string(),
            start: Some(EventTime::all_day(ymd(2024, 6, 13))),
            original_start: Some(EventTime::all_day(ymd(2024, 6, 11))),
        };

        let (snapshot, _) = bucket_events("Alice", vec![moved], &window());

        assert_eq!(snapshot.day("Tuesday").unwrap().events.len(), 1);
        assert!(snapshot.day("Thursday").unwrap().events.is_empty());
    }
}
