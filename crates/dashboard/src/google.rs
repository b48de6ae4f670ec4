//! Google Calendar implementation of [`EventSource`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime, Scope};
use google_calendar3::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use google_calendar3::yup_oauth2 as oauth;
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::path::Path;

use crate::error::FetchError;
use crate::source::{EventSource, EventTime, SourceEvent};

/// Read-only client for the calendars on the dashboard
pub struct GoogleCalendarSource {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    scope: Scope,
}

impl GoogleCalendarSource {
    /// Authenticate with the installed-application flow.
    ///
    /// The token is cached at `token_cache_path`; when no usable token is
    /// cached the user is asked on the terminal to visit the consent URL
    /// and paste the code back.
    pub async fn connect(client_secret_path: &Path, token_cache_path: &Path) -> Result<Self> {
        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("Failed to load native TLS roots")?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let secret = oauth::read_application_secret(client_secret_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to read OAuth client secret {}",
                    client_secret_path.display()
                )
            })?;

        if !token_cache_path.exists() {
            tracing::warn!(
                "No cached token at {}, calendar access must be authorized on this terminal",
                token_cache_path.display()
            );
        }

        let flow = oauth::InstalledFlowReturnMethod::Interactive;
        let auth = oauth::InstalledFlowAuthenticator::builder(secret, flow)
            .persist_tokens_to_disk(token_cache_path)
            .build()
            .await
            .context("Failed to build authenticator")?;

        Ok(Self {
            hub: CalendarHub::new(client, auth),
            scope: Scope::Readonly,
        })
    }
}

#[async_trait]
impl EventSource for GoogleCalendarSource {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<SourceEvent>, FetchError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .events()
                .list(calendar_id)
                .show_deleted(false)
                .single_events(true)
                .time_min(time_min)
                .time_max(time_max)
                .order_by("startTime")
                .add_scope(&self.scope);
            if let Some(token) = page_token.as_deref() {
                call = call.page_token(token);
            }

            let (_, page) = call
                .doit()
                .await
                .map_err(|e| FetchError::backend(calendar_id, e))?;

            let calendar_zone = page.time_zone.as_deref().and_then(parse_zone);
            events.extend(
                page.items
                    .unwrap_or_default()
                    .into_iter()
                    .map(|event| convert_event(event, calendar_zone)),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Fetched {} events from calendar {}", events.len(), calendar_id);
        Ok(events)
    }
}

fn parse_zone(name: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::debug!("Unknown time zone '{}'", name);
            None
        }
    }
}

fn convert_event(event: Event, calendar_zone: Option<Tz>) -> SourceEvent {
    SourceEvent {
        id: event.id.unwrap_or_default(),
        title: event.summary.unwrap_or_default(),
        start: event.start.map(|t| convert_time(t, calendar_zone)),
        original_start: event
            .original_start_time
            .map(|t| convert_time(t, calendar_zone)),
    }
}

/// The API client decodes `dateTime` to UTC. Put it back in the zone the
/// backend wrote it in (the event's own zone, else its calendar's) so the
/// date portion is that calendar's date. Falls back to local time.
fn convert_time(time: EventDateTime, calendar_zone: Option<Tz>) -> EventTime {
    let zone = time
        .time_zone
        .as_deref()
        .and_then(parse_zone)
        .or(calendar_zone);

    EventTime {
        date: time.date,
        date_time: time.date_time.map(|dt| in_zone(dt, zone)),
    }
}

fn in_zone(instant: DateTime<Utc>, zone: Option<Tz>) -> DateTime<FixedOffset> {
    match zone {
        Some(tz) => instant.with_timezone(&tz).fixed_offset(),
        None => instant.with_timezone(&Local).fixed_offset(),
    }
}
