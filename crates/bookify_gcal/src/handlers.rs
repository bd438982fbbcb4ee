// File: crates/bookify_gcal/src/handlers.rs
use crate::logic::{
    build_booking_record, build_calendar_event, parse_minutes, AvailabilityQuery,
    AvailabilityResponse, BookSlotRequest, BookingResponse, LogStatus, ResourceInfo,
    ResourcesResponse, DEFAULT_QUERY_DURATION,
};
use crate::extract::{JsonOrForm, QueryParams};
use axum::{
    extract::State,
    response::Json,
};
use bookify_availability::{
    compute_slots_per_resource, validate_and_reserve_with, validate_booking, AvailabilityError,
    Rejection, Resource, ResourceSelector, SchedulingPolicy, SlotQuery,
};
use bookify_common::{
    conflict, internal_error, validation_error, BookifyError, BookingLogService,
    CalendarService, ServiceError, TimeInterval,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// Define shared state needed by the booking handlers
#[derive(Clone)]
pub struct GcalState {
    pub policy: Arc<SchedulingPolicy>,
    pub calendar: Arc<dyn CalendarService>,
    /// Shared calendar for staff without their own.
    pub calendar_id: String,
    pub booking_log: Option<Arc<dyn BookingLogService>>,
}

impl GcalState {
    pub fn calendar_for<'a>(&'a self, resource: Option<&'a Resource>) -> &'a str {
        resource
            .and_then(|resource| resource.calendar_id.as_deref())
            .unwrap_or(&self.calendar_id)
    }

    /// Busy intervals within `range`, fetched once per distinct calendar.
    async fn busy_by_calendar<'r>(
        &self,
        resources: impl IntoIterator<Item = Option<&'r Resource>>,
        range: TimeInterval,
    ) -> Result<HashMap<String, Vec<TimeInterval>>, BookifyError> {
        let mut busy = HashMap::new();
        for resource in resources {
            let calendar_id = self.calendar_for(resource).to_string();
            if busy.contains_key(&calendar_id) {
                continue;
            }
            let intervals = self
                .calendar
                .get_busy_times(&calendar_id, range.start(), range.end())
                .await
                .map_err(|err| {
                    error!("Error fetching free/busy for {}: {}", calendar_id, err);
                    BookifyError::from(err)
                })?;
            busy.insert(calendar_id, intervals);
        }
        Ok(busy)
    }

    fn busy_of<'b>(
        &self,
        busy: &'b HashMap<String, Vec<TimeInterval>>,
        resource: Option<&Resource>,
    ) -> &'b [TimeInterval] {
        busy.get(self.calendar_for(resource))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn rejection_error(rejection: Rejection) -> BookifyError {
    if rejection.is_conflict() {
        conflict(rejection)
    } else {
        validation_error(rejection)
    }
}

/// Handler to get the slot grid of one day.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/availability", // Path relative to /api
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Every candidate start of the day with its availability", body = AvailabilityResponse),
        (status = 400, description = "Invalid date, unsupported duration or unknown resource"),
        (status = 502, description = "Calendar could not be queried")
    ),
    tag = "Booking"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<GcalState>>,
    QueryParams(query): QueryParams<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, BookifyError> {
    let date = NaiveDate::parse_from_str(query.date.trim(), "%Y-%m-%d").map_err(|_| {
        validation_error(format!("Invalid date '{}', expected YYYY-MM-DD", query.date))
    })?;
    let duration_minutes = match query.duration.as_deref() {
        Some(text) => parse_minutes(text)?.unwrap_or(DEFAULT_QUERY_DURATION),
        None => DEFAULT_QUERY_DURATION,
    };
    let selector = ResourceSelector::parse(query.resource.as_deref());
    let policy = &state.policy;

    // Caller mistakes are reported even on closed days
    if policy.requested_duration(duration_minutes).is_none() {
        return Err(validation_error(AvailabilityError::UnsupportedDuration(
            duration_minutes,
        )));
    }
    let today = policy.today();
    let bookable = policy
        .is_bookable_day(date, today, &selector)
        .map_err(|err| validation_error(AvailabilityError::from(err)))?;
    if !bookable {
        info!("{} is not bookable, no slots", date);
        return Ok(Json(AvailabilityResponse { slots: Vec::new() }));
    }

    let windows = policy
        .windows_for(date, &selector)
        .map_err(|err| validation_error(AvailabilityError::from(err)))?;
    let bounds = policy
        .day_bounds(date)
        .ok_or_else(|| internal_error(format!("Cannot resolve the day bounds of {date}")))?;
    debug!("{} spans {} hours", date, bounds.duration().num_hours());
    let busy = state
        .busy_by_calendar(windows.iter().map(|window| window.resource).collect::<Vec<_>>(), bounds)
        .await?;

    let slot_query = SlotQuery {
        date,
        today,
        duration_minutes,
        resource: &selector,
    };
    let slots = compute_slots_per_resource(policy, &slot_query, |resource| {
        state.busy_of(&busy, resource)
    })
    .map_err(validation_error)?;

    info!(
        "{} slots for {} ({} min, {}), {} free",
        slots.len(),
        date,
        duration_minutes,
        query.resource.as_deref().unwrap_or("any"),
        slots.iter().filter(|slot| slot.available).count()
    );
    Ok(Json(AvailabilityResponse { slots }))
}

/// Handler to book one slot.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book", // Path relative to /api
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Missing or invalid field, or a time the policy does not allow"),
        (status = 409, description = "Slot already taken"),
        (status = 502, description = "Calendar could not be queried or written")
    ),
    tag = "Booking"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<GcalState>>,
    JsonOrForm(payload): JsonOrForm<BookSlotRequest>,
) -> Result<Json<BookingResponse>, BookifyError> {
    let request = payload.into_booking_request()?;
    let policy = &state.policy;
    let today = policy.today();

    // Every field and policy check runs before any calendar traffic
    let preliminary = validate_booking(&request, policy, today).map_err(|rejection| {
        info!("Booking request rejected: {}", rejection);
        rejection_error(rejection)
    })?;

    let selector = ResourceSelector::parse(request.resource.as_deref());
    let windows = policy
        .windows_for(preliminary.date, &selector)
        .map_err(|err| validation_error(Rejection::from(err)))?;
    let busy = state
        .busy_by_calendar(
            windows.iter().map(|window| window.resource).collect::<Vec<_>>(),
            preliminary.interval,
        )
        .await?;

    let booking = validate_and_reserve_with(&request, policy, today, |resource| {
        state.busy_of(&busy, resource)
    })
    .into_result()
    .map_err(|rejection| {
        info!("Booking {} rejected: {}", preliminary.interval, rejection);
        rejection_error(rejection)
    })?;

    let calendar_id = state.calendar_for(booking.resource.as_ref()).to_string();
    let event = build_calendar_event(&booking, policy.time_zone.name());
    let created = state
        .calendar
        .create_event(&calendar_id, event)
        .await
        .map_err(|err| {
            match &err {
                ServiceError::Conflict => warn!("{} was taken at commit time", booking.interval),
                other => error!("Creating the event in {} failed: {}", calendar_id, other),
            }
            BookifyError::from(err)
        })?;
    info!(
        "Booked {} in {} as {:?}",
        booking.interval, calendar_id, created.event_id
    );

    let log_status = match &state.booking_log {
        None => LogStatus::Disabled,
        Some(log) => {
            let record = build_booking_record(&booking, created.event_id.clone(), Utc::now());
            match log.append_booking(record).await {
                Ok(()) => LogStatus::Appended,
                Err(err) => {
                    // The event exists; the booking stands
                    error!(
                        "Booking {:?} is committed but the log append failed: {}",
                        created.event_id, err
                    );
                    LogStatus::Failed
                }
            }
        }
    };

    Ok(Json(BookingResponse {
        ok: true,
        event_id: created.event_id,
        log_status,
        message: "Appointment booked successfully.".to_string(),
    }))
}

/// Handler to list the bookable staff.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/resources", // Path relative to /api
    responses(
        (status = 200, description = "Configured staff, empty when bookings are not per staff", body = ResourcesResponse)
    ),
    tag = "Booking"
))]
pub async fn list_resources_handler(
    State(state): State<Arc<GcalState>>,
) -> Json<ResourcesResponse> {
    Json(ResourcesResponse {
        resources: state.policy.resources.iter().map(ResourceInfo::from).collect(),
    })
}
