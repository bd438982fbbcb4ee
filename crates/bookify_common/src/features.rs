//! Feature flag handling for the Bookify backend.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation
//! - `gcal`: Enables the Google Calendar booking routes
//! - `sheets`: Enables the Google Sheets booking log
//!
//! Compile-time features decide what is linked in; the runtime checks below
//! additionally require the `use_*` flag and the matching config section.

use bookify_config::AppConfig;
use std::sync::Arc;

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Returns
///
/// `true` if the flag is set and the feature's config section exists
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the Google Calendar feature is enabled at runtime.
pub fn is_gcal_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_gcal, config.gcal.as_ref())
}

/// Check if the Google Sheets booking log is enabled at runtime.
pub fn is_sheets_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config.use_sheets, config.sheets.as_ref())
}
