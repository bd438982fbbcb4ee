// --- File: crates/bookify_gcal/src/routes.rs ---

use crate::auth::create_calendar_hub;
use crate::handlers::{
    book_slot_handler, get_availability_handler, list_resources_handler, GcalState,
};
use crate::service::GoogleCalendarService;
use axum::{
    routing::{get, post},
    Router,
};
use bookify_availability::SchedulingPolicy;
use bookify_common::{config_error, BookifyError, BookingLogService};
use bookify_config::GcalConfig;
use std::sync::Arc;
use tracing::info;

/// Creates a router containing the availability and booking routes.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/book", post(book_slot_handler))
        .route("/resources", get(list_resources_handler))
        .with_state(state)
}

/// Connects to Google Calendar and assembles the handler state.
pub async fn build_state(
    gcal_config: &GcalConfig,
    policy: Arc<SchedulingPolicy>,
    booking_log: Option<Arc<dyn BookingLogService>>,
) -> Result<Arc<GcalState>, BookifyError> {
    let calendar_id = gcal_config
        .calendar_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| config_error("gcal.calendar_id is missing"))?;

    let calendar_hub = create_calendar_hub(gcal_config)
        .await
        .map_err(|e| config_error(format!("Google Calendar authentication failed: {e}")))?;
    info!("Google Calendar client ready for {}", calendar_id);

    Ok(Arc::new(GcalState {
        policy,
        calendar: Arc::new(GoogleCalendarService::new(Arc::new(calendar_hub))),
        calendar_id,
        booking_log,
    }))
}
