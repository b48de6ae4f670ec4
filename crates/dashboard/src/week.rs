//! Sunday-to-Saturday week boundaries in a given time zone.

use chrono::{DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use family_types::DAYS_PER_WEEK;
use std::collections::HashMap;

/// The half-open interval `[start, end)` covering one calendar week.
#[derive(Debug, Clone)]
pub struct WeekWindow<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    days: [NaiveDate; DAYS_PER_WEEK],
    day_keys: HashMap<NaiveDate, usize>,
}

impl<Tz: TimeZone> WeekWindow<Tz> {
    /// The week containing `now`, starting at midnight of the preceding
    /// (or same) Sunday in `now`'s time zone.
    pub fn containing(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let since_sunday = u64::from(now.weekday().num_days_from_sunday());

        let first = today - Days::new(since_sunday);
        let days: [NaiveDate; DAYS_PER_WEEK] =
            std::array::from_fn(|i| first + Days::new(i as u64));
        let day_keys = days.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        Self {
            start: local_midnight(&tz, first),
            end: local_midnight(&tz, first + Days::new(DAYS_PER_WEEK as u64)),
            days,
            day_keys,
        }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// The Sunday opening the week.
    pub fn first_day(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn days(&self) -> &[NaiveDate; DAYS_PER_WEEK] {
        &self.days
    }

    /// Bucket index (0 = Sunday) for a day key, `None` outside the week.
    pub fn bucket_index(&self, day: NaiveDate) -> Option<usize> {
        self.day_keys.get(&day).copied()
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// First instant of `date` in `tz`.
///
/// Ambiguous midnights take the earlier instant. Zones that skip midnight
/// on a DST change resolve to the first valid time of that date.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let mut time = NaiveTime::MIN;
    loop {
        match tz.from_local_datetime(&date.and_time(time)) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earlier, _) => return earlier,
            LocalResult::None => {
                // DST gaps are at most a few hours; step in 15 minute increments.
                let (next, wrapped) =
                    time.overflowing_add_signed(chrono::Duration::minutes(15));
                if wrapped != 0 {
                    return tz.from_utc_datetime(&date.and_time(NaiveTime::MIN));
                }
                time = next;
            }
        }
    }
}
