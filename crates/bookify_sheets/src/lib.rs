// --- File: crates/bookify_sheets/src/lib.rs ---
pub mod auth;
pub mod service;

pub use auth::create_sheets_hub;
pub use service::{mock::MockBookingLogService, GoogleSheetsLogService, SheetsServiceError};
