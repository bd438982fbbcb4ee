// --- File: crates/services/bookify_backend/src/app_state.rs ---
use bookify_availability::SchedulingPolicy;
use bookify_common::{config_error, BookifyError, BookingLogService};
use bookify_config::AppConfig;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "gcal")]
use bookify_gcal::GcalState;

/// Everything the routers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub policy: Arc<SchedulingPolicy>,

    /// Booking routes; `None` when Google Calendar is disabled.
    #[cfg(feature = "gcal")]
    pub gcal_state: Option<Arc<GcalState>>,
}

impl AppState {
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, BookifyError> {
        let policy = Arc::new(
            SchedulingPolicy::from_config(&config.booking)
                .map_err(|e| config_error(format!("Invalid booking policy: {e}")))?,
        );
        info!(
            "Booking policy: zone {}, durations {:?}, {} staff",
            policy.time_zone,
            policy.durations,
            policy.resources.len()
        );

        #[allow(unused_variables)] // unused without the gcal feature
        let booking_log = booking_log(&config, &policy).await;

        #[cfg(feature = "gcal")]
        let gcal_state = match config.gcal.as_ref() {
            Some(gcal_config) if bookify_common::is_gcal_enabled(&config) => Some(
                bookify_gcal::build_state(gcal_config, policy.clone(), booking_log).await?,
            ),
            _ => {
                warn!("Google Calendar is disabled, booking routes are not mounted");
                None
            }
        };

        Ok(Self {
            config,
            policy,
            #[cfg(feature = "gcal")]
            gcal_state,
        })
    }
}

/// The audit log is optional; a broken log setup leaves bookings working.
#[cfg(feature = "sheets")]
async fn booking_log(
    config: &Arc<AppConfig>,
    policy: &SchedulingPolicy,
) -> Option<Arc<dyn BookingLogService>> {
    use bookify_sheets::{create_sheets_hub, GoogleSheetsLogService};

    let sheets_config = config.sheets.as_ref()?;
    if !bookify_common::is_sheets_enabled(config) {
        return None;
    }
    let Some(spreadsheet_id) = sheets_config
        .spreadsheet_id
        .clone()
        .filter(|id| !id.trim().is_empty())
    else {
        warn!("sheets.spreadsheet_id is missing, booking log disabled");
        return None;
    };

    match create_sheets_hub(sheets_config).await {
        Ok(hub) => {
            info!("Booking log writes to tab {}", sheets_config.tab_name);
            Some(Arc::new(GoogleSheetsLogService::new(
                Arc::new(hub),
                spreadsheet_id,
                sheets_config.tab_name.clone(),
                policy.time_zone,
            )))
        }
        Err(e) => {
            warn!("Google Sheets authentication failed, booking log disabled: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "sheets"))]
async fn booking_log(
    _config: &Arc<AppConfig>,
    _policy: &SchedulingPolicy,
) -> Option<Arc<dyn BookingLogService>> {
    None
}
