// File: crates/bookify_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AvailabilityQuery, AvailabilityResponse, BookSlotRequest, BookingResponse, DurationField,
    LogStatus, ResourceInfo, ResourcesResponse,
};
use bookify_availability::Slot;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_availability_handler,
        crate::handlers::book_slot_handler,
        crate::handlers::list_resources_handler,
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityResponse,
            Slot,
            BookSlotRequest,
            DurationField,
            BookingResponse,
            LogStatus,
            ResourceInfo,
            ResourcesResponse
        )
    ),
    tags(
        (name = "Booking", description = "Appointment availability and booking")
    ),
    servers(
        (url = "/api", description = "Main API server")
    )
)]
pub struct BookingApiDoc;
