//! In-memory event source shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use family_dashboard::{CalendarConfig, EventSource, EventTime, FetchError, SourceEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Requested range for one `list_events` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, Result<Vec<SourceEvent>, String>>>,
    calls: Mutex<Vec<FetchCall>>,
    delay: Option<Duration>,
    gate: Mutex<Option<Arc<Notify>>>,
    pub entered: Notify,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch takes `delay` of (tokio) time.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_events(&self, calendar_id: &str, events: Vec<SourceEvent>) {
        self.responses
            .lock()
            .unwrap()
            .insert(calendar_id.to_string(), Ok(events));
    }

    pub fn set_failure(&self, calendar_id: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(calendar_id.to_string(), Err(message.to_string()));
    }

    /// Hold every fetch until `gate` is notified.
    pub fn hold_fetches(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for FakeSource {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<SourceEvent>, FetchError> {
        self.calls.lock().unwrap().push(FetchCall {
            calendar_id: calendar_id.to_string(),
            time_min,
            time_max,
        });

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        self.entered.notify_one();

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self.responses.lock().unwrap().get(calendar_id).cloned();
        match response {
            Some(Ok(events)) => Ok(events),
            Some(Err(message)) => Err(FetchError::backend(calendar_id, message)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn calendar(name: &str, id: &str) -> CalendarConfig {
    CalendarConfig {
        name: name.to_string(),
        id: id.to_string(),
    }
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn all_day_event(id: &str, title: &str, day: NaiveDate) -> SourceEvent {
    SourceEvent {
        id: id.to_string(),
        title: title.to_string(),
        start: Some(EventTime::all_day(day)),
        original_start: None,
    }
}
