// File: crates/bookify_sheets/src/auth.rs
use bookify_config::SheetsConfig;
use bookify_gcal::auth::load_service_account_key;
use google_sheets4::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::ServiceAccountAuthenticator,
    Sheets,
};
use std::error::Error;

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type SheetsHub = Sheets<Connector>;

pub async fn create_sheets_hub(
    config: &SheetsConfig,
) -> Result<SheetsHub, Box<dyn Error + Send + Sync>> {
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

    Ok(Sheets::new(client, auth))
}
