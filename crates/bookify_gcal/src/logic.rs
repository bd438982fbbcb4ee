// --- File: crates/bookify_gcal/src/logic.rs ---
use bookify_availability::{BookingRequest, ContactDetails, Resource, Slot, ValidatedBooking};
use bookify_common::{validation_error, BookifyError, BookingRecord, CalendarEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking source recorded in the event description and the audit log.
pub const BOOKING_SOURCE: &str = "Website";

/// Duration used when an availability query does not name one.
pub const DEFAULT_QUERY_DURATION: i64 = 30;

// --- Data Structures ---
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Local calendar date, YYYY-MM-DD.
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-06-03"))]
    pub date: String,
    /// Minutes; 30 when omitted.
    #[cfg_attr(feature = "openapi", schema(example = "60"))]
    pub duration: Option<String>,
    /// Staff id, or `any`.
    #[cfg_attr(feature = "openapi", schema(example = "any"))]
    pub resource: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AvailabilityResponse {
    pub slots: Vec<Slot>,
}

/// Forms send every value as text, JSON clients usually send a number.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum DurationField {
    Minutes(i64),
    Text(String),
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct BookSlotRequest {
    #[cfg_attr(feature = "openapi", schema(example = "2025-06-03"))]
    pub date: String,
    #[cfg_attr(feature = "openapi", schema(example = "10:00"))]
    pub time: String,
    pub duration: Option<DurationField>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub procedure: String,
    pub symptoms: Option<String>,
    pub resource: Option<String>,
}

impl BookSlotRequest {
    pub fn into_booking_request(self) -> Result<BookingRequest, BookifyError> {
        let duration_minutes = match self.duration {
            None => None,
            Some(DurationField::Minutes(minutes)) => Some(minutes),
            Some(DurationField::Text(text)) => parse_minutes(&text)?,
        };

        Ok(BookingRequest {
            date: self.date,
            time: self.time,
            duration_minutes,
            resource: self.resource,
            contact: ContactDetails {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                procedure: self.procedure,
                symptoms: self.symptoms,
            },
        })
    }
}

/// Blank text counts as missing; anything else must be whole minutes.
pub fn parse_minutes(text: &str) -> Result<Option<i64>, BookifyError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| validation_error(format!("Invalid duration '{text}', expected minutes")))
}

/// Outcome of the best-effort audit log append.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Appended,
    Failed,
    Disabled,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub ok: bool,
    pub event_id: Option<String>,
    pub log_status: LogStatus,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResourceInfo {
    pub id: String,
    pub name: String,
}

impl From<&Resource> for ResourceInfo {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResourcesResponse {
    pub resources: Vec<ResourceInfo>,
}

// --- Booking Artifacts ---

/// The calendar event for a validated booking, shown in `time_zone`.
pub fn build_calendar_event(booking: &ValidatedBooking, time_zone: &str) -> CalendarEvent {
    let contact = &booking.contact;
    let summary = format!(
        "Booking: {} {} - {} ({} min)",
        contact.first_name, contact.last_name, contact.procedure, booking.duration_minutes
    );

    let mut lines = vec![
        format!("Name: {} {}", contact.first_name, contact.last_name),
        format!("Email: {}", contact.email),
        format!("Phone: {}", contact.phone),
        format!("Procedure: {}", contact.procedure),
        format!("Symptoms: {}", contact.symptoms.as_deref().unwrap_or("-")),
    ];
    if let Some(resource) = &booking.resource {
        lines.push(format!("Staff: {}", resource.name));
    }
    lines.push(format!("Source: {BOOKING_SOURCE}"));

    CalendarEvent {
        interval: booking.interval,
        summary,
        description: Some(lines.join("\n")),
        time_zone: time_zone.to_string(),
    }
}

pub fn build_booking_record(
    booking: &ValidatedBooking,
    event_id: Option<String>,
    booked_at: DateTime<Utc>,
) -> BookingRecord {
    let contact = booking.contact.clone();
    BookingRecord {
        booked_at,
        date: booking.date,
        time: booking.time,
        duration_minutes: booking.duration_minutes,
        first_name: contact.first_name,
        last_name: contact.last_name,
        email: contact.email,
        phone: contact.phone,
        procedure: contact.procedure,
        symptoms: contact.symptoms,
        event_id,
        resource: booking.resource.as_ref().map(|resource| resource.id.clone()),
        source: BOOKING_SOURCE.to_string(),
    }
}
