// --- File: crates/bookify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the booking widget's static files, served at `/`.
    #[serde(default)]
    pub static_dir: Option<String>,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_prefix: default_log_file_prefix(),
        }
    }
}

// --- Google Calendar Config ---
// Credentials come either from a key file or from a base64 encoded
// service account JSON (usually "secret_from_env").
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    pub calendar_id: Option<String>, // Mandatory
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub service_account_json_base64: Option<String>,
}

// --- Google Sheets Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>, // Mandatory
    #[serde(default = "default_tab_name")]
    pub tab_name: String,
    #[serde(default)]
    pub key_path: Option<String>,
    #[serde(default)]
    pub service_account_json_base64: Option<String>,
}

// --- Booking Policy Config ---
/// One block of opening hours, e.g. `Mon..Fri 09:00-13:00`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HoursConfig {
    /// Weekday names ("Mon", "Tuesday", ...).
    pub days: Vec<String>,
    /// Local start time, HH:MM.
    pub start: String,
    /// Local end time, HH:MM.
    pub end: String,
}

/// A bookable staff member with their own shifts.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StaffConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Own calendar for busy times and new events; the shared `gcal.calendar_id` otherwise.
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub hours: Vec<HoursConfig>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BookingConfig {
    /// IANA zone all wall-clock hours are interpreted in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: i64,
    /// Bookable durations in minutes.
    #[serde(default = "default_durations")]
    pub durations: Vec<i64>,
    /// Days off for everybody, regardless of staff shifts.
    #[serde(default = "default_excluded_weekdays")]
    pub excluded_weekdays: Vec<String>,
    #[serde(default = "default_min_days_ahead")]
    pub min_days_ahead: i64,
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: i64,
    /// Opening hours used when no staff is configured.
    #[serde(default = "default_hours")]
    pub hours: Vec<HoursConfig>,
    #[serde(default)]
    pub staff: Vec<StaffConfig>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            slot_step_minutes: default_slot_step_minutes(),
            durations: default_durations(),
            excluded_weekdays: default_excluded_weekdays(),
            min_days_ahead: default_min_days_ahead(),
            max_days_ahead: default_max_days_ahead(),
            hours: default_hours(),
            staff: Vec::new(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_sheets: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,

    #[serde(default)]
    pub booking: BookingConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_prefix() -> String {
    "bookify.log".to_string()
}

fn default_tab_name() -> String {
    "Bookings".to_string()
}

fn default_time_zone() -> String {
    "Europe/Sofia".to_string()
}

fn default_slot_step_minutes() -> i64 {
    30
}

fn default_durations() -> Vec<i64> {
    vec![30, 60, 90]
}

fn default_excluded_weekdays() -> Vec<String> {
    vec!["Sun".to_string()]
}

fn default_min_days_ahead() -> i64 {
    1
}

fn default_max_days_ahead() -> i64 {
    60
}

fn default_hours() -> Vec<HoursConfig> {
    vec![HoursConfig {
        days: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .map(|day| day.to_string())
            .collect(),
        start: "09:00".to_string(),
        end: "18:30".to_string(),
    }]
}
