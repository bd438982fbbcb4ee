// --- File: crates/bookify_availability/src/validator.rs ---
//! Booking validation: re-derives the single requested interval and checks it
//! against the policy and a freshly fetched busy set.

use bookify_common::{overlaps_any, TimeInterval};
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::debug;

use crate::policy::{
    parse_hhmm, Resource, ResourceSelector, ResourceWindow, SchedulingPolicy, UnknownResource,
};

/// Why a booking request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Unsupported duration: {0} minutes")]
    UnsupportedDuration(i64),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    #[error("{0} is outside the booking window")]
    OutsideHorizon(NaiveDate),
    #[error("No appointments are available on {0}")]
    ClosedDay(NaiveDate),
    #[error("{} for {duration_minutes} minutes is outside working hours", .time.format("%H:%M"))]
    OutsideWorkingHours {
        time: NaiveTime,
        duration_minutes: i64,
    },
    #[error("{} is not a valid start time", .0.format("%H:%M"))]
    OffGrid(NaiveTime),
    #[error("{date} {} does not exist in the local time zone", .time.format("%H:%M"))]
    NonexistentLocalTime { date: NaiveDate, time: NaiveTime },
    #[error("Sorry, that slot just got taken.")]
    SlotTaken,
}

impl Rejection {
    /// Conflicts are reported apart from validation failures so the client can
    /// offer another time.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Rejection::SlotTaken)
    }
}

impl From<UnknownResource> for Rejection {
    fn from(err: UnknownResource) -> Self {
        Rejection::UnknownResource(err.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub procedure: String,
    pub symptoms: Option<String>,
}

/// A booking as received from the client, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub duration_minutes: Option<i64>,
    pub resource: Option<String>,
    pub contact: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: i64,
    /// The resource that serves the booking; `None` when no staff is configured.
    pub resource: Option<Resource>,
    pub interval: TimeInterval,
    /// Trimmed contact fields, empty symptoms dropped.
    pub contact: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(ValidatedBooking),
    Rejected(Rejection),
}

impl Verdict {
    pub fn into_result(self) -> Result<ValidatedBooking, Rejection> {
        match self {
            Verdict::Accepted(booking) => Ok(booking),
            Verdict::Rejected(rejection) => Err(rejection),
        }
    }
}

/// A request that passed every field and policy check, with the windows it fits.
struct CheckedRequest<'p> {
    date: NaiveDate,
    time: NaiveTime,
    duration_minutes: i64,
    interval: TimeInterval,
    contact: ContactDetails,
    /// Fitting, on-grid windows in resource order; never empty.
    windows: Vec<ResourceWindow<'p>>,
}

impl CheckedRequest<'_> {
    fn into_booking(self, resource: Option<&Resource>) -> ValidatedBooking {
        ValidatedBooking {
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
            resource: resource.cloned(),
            interval: self.interval,
            contact: self.contact,
        }
    }
}

fn check_request<'p>(
    request: &BookingRequest,
    policy: &'p SchedulingPolicy,
    today: NaiveDate,
) -> Result<CheckedRequest<'p>, Rejection> {
    let contact = normalize_contact(&request.contact);

    let date_text = required("date", &request.date)?;
    let time_text = required("time", &request.time)?;
    let duration_minutes = request
        .duration_minutes
        .ok_or(Rejection::MissingField("duration"))?;
    required("firstName", &contact.first_name)?;
    required("lastName", &contact.last_name)?;
    required("email", &contact.email)?;
    required("phone", &contact.phone)?;
    required("procedure", &contact.procedure)?;

    if !looks_like_email(&contact.email) {
        return Err(Rejection::InvalidEmail);
    }

    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
        .map_err(|_| Rejection::InvalidDate(date_text.to_string()))?;
    let time = parse_hhmm(time_text).map_err(|_| Rejection::InvalidTime(time_text.to_string()))?;
    let duration = policy
        .requested_duration(duration_minutes)
        .ok_or(Rejection::UnsupportedDuration(duration_minutes))?;

    let selector = ResourceSelector::parse(request.resource.as_deref());
    let windows = policy.windows_for(date, &selector)?;

    if !policy.horizon.contains(date, today) {
        return Err(Rejection::OutsideHorizon(date));
    }
    if windows.is_empty() {
        return Err(Rejection::ClosedDay(date));
    }

    // A specific resource has a single window, so this checks its own shift
    let fitting: Vec<ResourceWindow<'p>> = windows
        .into_iter()
        .filter(|candidate| candidate.window.fits(time, duration))
        .collect();
    if fitting.is_empty() {
        return Err(Rejection::OutsideWorkingHours {
            time,
            duration_minutes,
        });
    }
    let on_grid: Vec<ResourceWindow<'p>> = fitting
        .into_iter()
        .filter(|candidate| candidate.window.on_grid(time, policy.step))
        .collect();
    if on_grid.is_empty() {
        return Err(Rejection::OffGrid(time));
    }

    let start = policy
        .to_instant(date, time)
        .ok_or(Rejection::NonexistentLocalTime { date, time })?;
    let interval = TimeInterval::starting_at(start, duration)
        .map_err(|_| Rejection::NonexistentLocalTime { date, time })?;

    Ok(CheckedRequest {
        date,
        time,
        duration_minutes,
        interval,
        contact,
        windows: on_grid,
    })
}

/// Checks every field of `request` against `policy`. Does not look at busy data.
///
/// For `any`, the booking is assigned to the first resource whose window fits.
pub fn validate_booking(
    request: &BookingRequest,
    policy: &SchedulingPolicy,
    today: NaiveDate,
) -> Result<ValidatedBooking, Rejection> {
    let checked = check_request(request, policy, today)?;
    let resource = checked.windows.first().and_then(|first| first.resource);
    Ok(checked.into_booking(resource))
}

/// Rejects the booking if its interval overlaps any of `fresh_busy`.
pub fn ensure_slot_free(
    booking: &ValidatedBooking,
    fresh_busy: &[TimeInterval],
) -> Result<(), Rejection> {
    if overlaps_any(&booking.interval, fresh_busy) {
        debug!("{} overlaps existing busy time", booking.interval);
        return Err(Rejection::SlotTaken);
    }
    Ok(())
}

/// Field validation followed by the overlap test against freshly fetched busy data.
pub fn validate_and_reserve(
    request: &BookingRequest,
    policy: &SchedulingPolicy,
    today: NaiveDate,
    fresh_busy: &[TimeInterval],
) -> Verdict {
    validate_and_reserve_with(request, policy, today, |_| fresh_busy)
}

/// Like [`validate_and_reserve`] with busy data per resource. For `any`, the
/// first fitting resource that is free at the requested time takes the booking.
pub fn validate_and_reserve_with<'b, F>(
    request: &BookingRequest,
    policy: &SchedulingPolicy,
    today: NaiveDate,
    busy_for: F,
) -> Verdict
where
    F: Fn(Option<&Resource>) -> &'b [TimeInterval],
{
    let checked = match check_request(request, policy, today) {
        Ok(checked) => checked,
        Err(rejection) => return Verdict::Rejected(rejection),
    };

    let free = checked
        .windows
        .iter()
        .map(|candidate| candidate.resource)
        .find(|resource| !overlaps_any(&checked.interval, busy_for(*resource)));

    match free {
        Some(resource) => Verdict::Accepted(checked.into_booking(resource)),
        None => {
            debug!("{} overlaps existing busy time", checked.interval);
            Verdict::Rejected(Rejection::SlotTaken)
        }
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, Rejection> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Rejection::MissingField(field));
    }
    Ok(value)
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn normalize_contact(contact: &ContactDetails) -> ContactDetails {
    ContactDetails {
        first_name: contact.first_name.trim().to_string(),
        last_name: contact.last_name.trim().to_string(),
        email: contact.email.trim().to_string(),
        phone: contact.phone.trim().to_string(),
        procedure: contact.procedure.trim().to_string(),
        symptoms: contact
            .symptoms
            .as_deref()
            .map(str::trim)
            .filter(|symptoms| !symptoms.is_empty())
            .map(str::to_string),
    }
}
