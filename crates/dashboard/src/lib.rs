//! Weekly family calendar dashboard.
//!
//! A background task periodically fetches this week's events for each
//! configured calendar, buckets them by weekday into a [`FamilySnapshot`]
//! and publishes it; HTTP handlers serve whichever snapshot is current.
//!
//! [`FamilySnapshot`]: family_types::FamilySnapshot

pub mod config;
pub mod day_key;
pub mod error;
pub mod google;
pub mod handlers;
pub mod publisher;
pub mod render;
pub mod routes;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod week;

pub use config::{CalendarConfig, CalendarList, DashboardConfig};
pub use error::{ConfigError, FetchError};
pub use publisher::{SnapshotPublisher, SnapshotReader};
pub use scheduler::RefreshScheduler;
pub use snapshot::{build_snapshot, BuildOutcome};
pub use source::{EventSource, EventTime, SourceEvent};
pub use week::WeekWindow;
