// --- File: crates/bookify_gcal/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod doc;
pub mod extract;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

pub use handlers::GcalState;
pub use routes::{build_state, routes};
pub use service::{mock::MockCalendarService, GcalServiceError, GoogleCalendarService};
