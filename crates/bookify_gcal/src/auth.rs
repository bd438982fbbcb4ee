// File: crates/bookify_gcal/src/auth.rs
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bookify_config::GcalConfig;
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{
        parse_service_account_key, read_service_account_key, ServiceAccountAuthenticator,
        ServiceAccountKey,
    },
    CalendarHub,
};
use std::{error::Error, path::Path};
use tracing::debug;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Reads the service account key from `key_path`, or else from the base64
/// encoded JSON document. The Sheets client authenticates with the same key.
pub async fn load_service_account_key(
    key_path: Option<&str>,
    json_base64: Option<&str>,
) -> Result<ServiceAccountKey, Box<dyn Error + Send + Sync>> {
    if let Some(path) = key_path.filter(|path| !path.trim().is_empty()) {
        debug!("Reading service account key from {}", path);
        return Ok(read_service_account_key(Path::new(path)).await?);
    }

    let encoded = json_base64
        .filter(|encoded| !encoded.trim().is_empty())
        .ok_or("Missing key_path or service_account_json_base64")?;
    let json = STANDARD.decode(encoded.trim())?;
    Ok(parse_service_account_key(json)?)
}

pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<HubType, Box<dyn Error + Send + Sync>> {
    let sa_key = load_service_account_key(
        config.key_path.as_deref(),
        config.service_account_json_base64.as_deref(),
    )
    .await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
