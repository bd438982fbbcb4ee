// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Busy intervals come from the free/busy endpoint, which already leaves out
//! cancelled and transparent events. New bookings are inserted as plain events.

use bookify_common::{
    overlaps_any, BoxFuture, CalendarEvent, CalendarEventResult, CalendarService, IntervalError,
    ServiceError, TimeInterval,
};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime, FreeBusyRequest, FreeBusyRequestItem};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::HubType;

const SERVICE_NAME: &str = "Google Calendar";

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Calendar {0} is missing from the free/busy response")]
    MissingCalendar(String),
    #[error("Calendar {calendar_id} could not be queried: {reasons}")]
    CalendarError { calendar_id: String, reasons: String },
    #[error("Busy period without start or end")]
    IncompleteBusyPeriod,
    #[error("Invalid busy period: {0}")]
    InvalidBusyPeriod(#[from] IntervalError),
    #[error("Booking conflict")]
    Conflict,
}

impl From<GcalServiceError> for ServiceError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::Conflict => ServiceError::Conflict,
            GcalServiceError::ApiError(e) => ServiceError::unavailable(SERVICE_NAME, e),
            other => ServiceError::invalid_response(SERVICE_NAME, other),
        }
    }
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }

    async fn query_busy(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<TimeInterval>, GcalServiceError> {
        let req = FreeBusyRequest {
            time_min: Some(start_time),
            time_max: Some(end_time),
            time_zone: Some("UTC".to_string()),
            items: Some(vec![FreeBusyRequestItem {
                id: Some(calendar_id.to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };

        let (_response, freebusy_response) =
            self.calendar_hub.freebusy().query(req).doit().await?;

        // A calendar we cannot see must not look free
        let calendar = freebusy_response
            .calendars
            .and_then(|mut calendars| calendars.remove(calendar_id))
            .ok_or_else(|| GcalServiceError::MissingCalendar(calendar_id.to_string()))?;
        if let Some(errors) = calendar.errors.filter(|errors| !errors.is_empty()) {
            let reasons = errors
                .iter()
                .map(|e| e.reason.clone().unwrap_or_else(|| "unknown".to_string()))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GcalServiceError::CalendarError {
                calendar_id: calendar_id.to_string(),
                reasons,
            });
        }

        let mut busy_periods = Vec::new();
        for period in calendar.busy.unwrap_or_default() {
            let (start, end) = match (period.start, period.end) {
                (Some(start), Some(end)) => (start, end),
                _ => return Err(GcalServiceError::IncompleteBusyPeriod),
            };
            if start == end {
                // Zero-length periods block nothing
                continue;
            }
            busy_periods.push(TimeInterval::new(start, end)?);
        }
        busy_periods.sort_by_key(|interval| interval.start());
        debug!(
            "{} busy periods in {} between {} and {}",
            busy_periods.len(),
            calendar_id,
            start_time,
            end_time
        );
        Ok(busy_periods)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> Result<CalendarEventResult, GcalServiceError> {
        let interval = event.interval;

        // Last look at the calendar right before committing
        let busy = self
            .query_busy(calendar_id, interval.start(), interval.end())
            .await?;
        if overlaps_any(&interval, &busy) {
            warn!("{} became busy in {} before insert", interval, calendar_id);
            return Err(GcalServiceError::Conflict);
        }

        let new_event = Event {
            summary: Some(event.summary),
            description: event.description,
            start: Some(EventDateTime {
                date_time: Some(interval.start()),
                time_zone: Some(event.time_zone.clone()),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(interval.end()),
                time_zone: Some(event.time_zone),
                ..Default::default()
            }),
            guests_can_invite_others: Some(false),
            guests_can_modify: Some(false),
            guests_can_see_other_guests: Some(false),
            ..Default::default()
        };

        let (_response, created_event) = self
            .calendar_hub
            .events()
            .insert(new_event, calendar_id)
            .doit()
            .await?;
        info!("Created event {:?} in {}", created_event.id, calendar_id);

        Ok(CalendarEventResult {
            event_id: created_event.id,
            status: created_event
                .status
                .unwrap_or_else(|| "confirmed".to_string()),
        })
    }
}

impl CalendarService for GoogleCalendarService {
    fn get_busy_times(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<TimeInterval>, ServiceError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move {
            Ok(self
                .query_busy(&calendar_id, start_time, end_time)
                .await?)
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, ServiceError> {
        let calendar_id = calendar_id.to_string();
        Box::pin(async move { Ok(self.insert_event(&calendar_id, event).await?) })
    }
}

/// In-memory calendar for tests.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    const MOCK_NAME: &str = "Mock calendar";

    /// An event created through the mock.
    #[derive(Debug, Clone, PartialEq)]
    pub struct MockEvent {
        pub id: String,
        pub calendar_id: String,
        pub event: CalendarEvent,
    }

    /// Mock calendar service for testing.
    #[derive(Default)]
    pub struct MockCalendarService {
        busy: Mutex<HashMap<String, Vec<TimeInterval>>>,
        events: Mutex<Vec<MockEvent>>,
        offline: AtomicBool,
        conflict_on_insert: AtomicBool,
    }

    impl MockCalendarService {
        /// Create a new mock calendar service.
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds busy time in `calendar_id`.
        pub fn with_busy(self, calendar_id: &str, intervals: Vec<TimeInterval>) -> Self {
            self.add_busy(calendar_id, intervals);
            self
        }

        pub fn add_busy(&self, calendar_id: &str, intervals: Vec<TimeInterval>) {
            if let Ok(mut busy) = self.busy.lock() {
                busy.entry(calendar_id.to_string())
                    .or_default()
                    .extend(intervals);
            }
        }

        /// Every call fails as if Google could not be reached.
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        /// The next inserts report a conflict, as if another booking won the race.
        pub fn set_conflict_on_insert(&self, conflict: bool) {
            self.conflict_on_insert.store(conflict, Ordering::SeqCst);
        }

        pub fn events(&self) -> Vec<MockEvent> {
            self.events
                .lock()
                .map(|events| events.clone())
                .unwrap_or_default()
        }

        fn check_online(&self) -> Result<(), ServiceError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ServiceError::unavailable(MOCK_NAME, "calendar is offline"));
            }
            Ok(())
        }

        fn busy_between(
            &self,
            calendar_id: &str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> Result<Vec<TimeInterval>, ServiceError> {
            let range = TimeInterval::new(start_time, end_time)
                .map_err(|e| ServiceError::invalid_response(MOCK_NAME, e))?;
            let seeded = self
                .busy
                .lock()
                .map_err(|_| ServiceError::unavailable(MOCK_NAME, "busy store poisoned"))?
                .get(calendar_id)
                .cloned()
                .unwrap_or_default();
            let booked: Vec<TimeInterval> = self
                .events
                .lock()
                .map_err(|_| ServiceError::unavailable(MOCK_NAME, "event store poisoned"))?
                .iter()
                .filter(|created| created.calendar_id == calendar_id)
                .map(|created| created.event.interval)
                .collect();

            let mut busy: Vec<TimeInterval> = seeded
                .into_iter()
                .chain(booked)
                .filter(|interval| interval.overlaps(&range))
                .collect();
            busy.sort_by_key(|interval| interval.start());
            Ok(busy)
        }
    }

    impl CalendarService for MockCalendarService {
        fn get_busy_times(
            &self,
            calendar_id: &str,
            start_time: DateTime<Utc>,
            end_time: DateTime<Utc>,
        ) -> BoxFuture<'_, Vec<TimeInterval>, ServiceError> {
            let calendar_id = calendar_id.to_string();
            Box::pin(async move {
                self.check_online()?;
                self.busy_between(&calendar_id, start_time, end_time)
            })
        }

        fn create_event(
            &self,
            calendar_id: &str,
            event: CalendarEvent,
        ) -> BoxFuture<'_, CalendarEventResult, ServiceError> {
            let calendar_id = calendar_id.to_string();
            Box::pin(async move {
                self.check_online()?;
                if self.conflict_on_insert.load(Ordering::SeqCst) {
                    return Err(ServiceError::Conflict);
                }
                let interval = event.interval;
                let busy = self.busy_between(&calendar_id, interval.start(), interval.end())?;
                if overlaps_any(&interval, &busy) {
                    return Err(ServiceError::Conflict);
                }

                let id = format!("mock-event-{}", Uuid::new_v4());
                self.events
                    .lock()
                    .map_err(|_| ServiceError::unavailable(MOCK_NAME, "event store poisoned"))?
                    .push(MockEvent {
                        id: id.clone(),
                        calendar_id,
                        event,
                    });

                Ok(CalendarEventResult {
                    event_id: Some(id),
                    status: "confirmed".to_string(),
                })
            })
        }
    }
}
