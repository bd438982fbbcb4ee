// --- File: crates/bookify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod http; // HTTP response mapping
pub mod logging; // Logging bootstrap
pub mod models; // Time intervals
pub mod routes; // Route definitions
pub mod services; // Service abstractions


// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, validation_error,
    BookifyError, HttpStatusCode,
};

pub use models::{merge_intervals, overlaps_any, IntervalError, TimeInterval};

pub use services::{
    BookingLogService, BookingRecord, BoxFuture, CalendarEvent, CalendarEventResult,
    CalendarService, ServiceError,
};

pub use logging::{init, log_result};

pub use features::{is_feature_enabled, is_gcal_enabled, is_sheets_enabled};
