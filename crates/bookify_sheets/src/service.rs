// --- File: crates/bookify_sheets/src/service.rs ---
//! Google Sheets booking log.
//!
//! Each committed booking is appended as one row to the configured tab. The
//! column order is: booked at, date, time, duration, first name, last name,
//! email, phone, procedure, symptoms, event id, staff, source.

use bookify_common::{BookingLogService, BookingRecord, BoxFuture, ServiceError};
use chrono_tz::Tz;
use google_sheets4::api::ValueRange;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::SheetsHub;

const SERVICE_NAME: &str = "Google Sheets";

/// Errors that can occur when appending to the booking log.
#[derive(Error, Debug)]
pub enum SheetsServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_sheets4::Error),
    #[error("Append to {0} reported no updated rows")]
    NothingAppended(String),
}

impl From<SheetsServiceError> for ServiceError {
    fn from(err: SheetsServiceError) -> Self {
        match err {
            SheetsServiceError::ApiError(e) => ServiceError::unavailable(SERVICE_NAME, e),
            other => ServiceError::invalid_response(SERVICE_NAME, other),
        }
    }
}

/// One log row; `booked_at` is written as local time in `time_zone`.
pub fn booking_row(record: &BookingRecord, time_zone: Tz) -> Vec<Value> {
    let text = |value: &str| Value::String(value.to_string());
    vec![
        text(
            &record
                .booked_at
                .with_timezone(&time_zone)
                .format("%d.%m.%Y %H:%M:%S")
                .to_string(),
        ),
        text(&record.date.format("%Y-%m-%d").to_string()),
        text(&record.time.format("%H:%M").to_string()),
        Value::from(record.duration_minutes),
        text(&record.first_name),
        text(&record.last_name),
        text(&record.email),
        text(&record.phone),
        text(&record.procedure),
        text(record.symptoms.as_deref().unwrap_or("-")),
        text(record.event_id.as_deref().unwrap_or("")),
        text(record.resource.as_deref().unwrap_or("")),
        text(&record.source),
    ]
}

/// Google Sheets implementation of the booking log.
pub struct GoogleSheetsLogService {
    sheets_hub: Arc<SheetsHub>,
    spreadsheet_id: String,
    tab_name: String,
    time_zone: Tz,
}

impl GoogleSheetsLogService {
    pub fn new(
        sheets_hub: Arc<SheetsHub>,
        spreadsheet_id: String,
        tab_name: String,
        time_zone: Tz,
    ) -> Self {
        Self {
            sheets_hub,
            spreadsheet_id,
            tab_name,
            time_zone,
        }
    }

    async fn append_row(&self, record: BookingRecord) -> Result<(), SheetsServiceError> {
        let range = format!("{}!A1", self.tab_name);
        let request = ValueRange {
            values: Some(vec![booking_row(&record, self.time_zone)]),
            ..Default::default()
        };

        let (_response, appended) = self
            .sheets_hub
            .spreadsheets()
            .values_append(request, &self.spreadsheet_id, &range)
            .value_input_option("RAW")
            .insert_data_option("INSERT_ROWS")
            .doit()
            .await?;

        let updated_rows = appended
            .updates
            .and_then(|updates| updates.updated_rows)
            .unwrap_or(0);
        if updated_rows == 0 {
            return Err(SheetsServiceError::NothingAppended(range));
        }
        debug!("Appended {} row(s) to {}", updated_rows, range);
        info!("Logged booking {:?} to {}", record.event_id, self.tab_name);
        Ok(())
    }
}

impl BookingLogService for GoogleSheetsLogService {
    fn append_booking(&self, record: BookingRecord) -> BoxFuture<'_, (), ServiceError> {
        Box::pin(async move { Ok(self.append_row(record).await?) })
    }
}

/// In-memory booking log for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockBookingLogService {
        records: Mutex<Vec<BookingRecord>>,
        failing: AtomicBool,
    }

    impl MockBookingLogService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every append fails while set.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn records(&self) -> Vec<BookingRecord> {
            self.records
                .lock()
                .map(|records| records.clone())
                .unwrap_or_default()
        }
    }

    impl BookingLogService for MockBookingLogService {
        fn append_booking(&self, record: BookingRecord) -> BoxFuture<'_, (), ServiceError> {
            Box::pin(async move {
                if self.failing.load(Ordering::SeqCst) {
                    return Err(ServiceError::unavailable("Mock booking log", "log is failing"));
                }
                self.records
                    .lock()
                    .map_err(|_| ServiceError::unavailable("Mock booking log", "record store poisoned"))?
                    .push(record);
                Ok(())
            })
        }
    }
}
