// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The booking core never talks to Google directly. Handlers receive a
//! [`CalendarService`] (busy-interval source and event sink) and an optional
//! [`BookingLogService`] (audit log), so tests can swap in in-memory versions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::models::TimeInterval;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors reported by external collaborators.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The collaborator itself found the interval taken while committing.
    #[error("Requested interval is already taken")]
    Conflict,
    /// The collaborator answered, but with data we refuse to interpret.
    #[error("{service} returned invalid data: {message}")]
    InvalidResponse { service: String, message: String },
    /// The collaborator could not be reached or returned an error.
    #[error("{service} request failed: {message}")]
    Unavailable { service: String, message: String },
}

impl ServiceError {
    pub fn invalid_response(service: &str, message: impl ToString) -> Self {
        ServiceError::InvalidResponse {
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    pub fn unavailable(service: &str, message: impl ToString) -> Self {
        ServiceError::Unavailable {
            service: service.to_string(),
            message: message.to_string(),
        }
    }
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Busy (opaque, non-cancelled) intervals of `calendar_id` within `[start, end)`.
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<TimeInterval>, ServiceError>;

    /// Creates a calendar event. Returns [`ServiceError::Conflict`] if the
    /// interval turned out to be taken at commit time.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, ServiceError>;
}

/// A trait for the append-only booking log.
pub trait BookingLogService: Send + Sync {
    fn append_booking(&self, record: BookingRecord) -> BoxFuture<'_, (), ServiceError>;
}

/// Data structures for calendar service operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub interval: TimeInterval,
    /// The summary or title of the event.
    pub summary: String,
    pub description: Option<String>,
    /// IANA zone the event is displayed in.
    pub time_zone: String,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}

/// One committed booking as written to the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub booked_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub procedure: String,
    pub symptoms: Option<String>,
    pub event_id: Option<String>,
    pub resource: Option<String>,
    pub source: String,
}
