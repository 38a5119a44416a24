//! Spending Dashboard is a small web app for exploring credit card spending.
//!
//! Transactions are loaded from a built-in sample or an uploaded CSV/Excel
//! file, aggregated by month, year and category, and rendered as charts and
//! tables. The raw and aggregated data can be downloaded as CSV.
//!
//! This library provides the router that directly serves the HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod endpoints;
mod export;
mod html;
mod internal_server_error;
mod navigation;
mod normalize;
mod not_found;
mod record_source;
mod report;
mod routing;
mod session;
mod transaction;
mod upload;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DashboardConfig};
pub use routing::build_router;

use crate::{alert::Alert, internal_server_error::InternalServerError, record_source::REQUIRED_COLUMNS};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The uploaded file does not have a `.csv` or `.xlsx` extension.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The header row of the uploaded file does not contain a required column.
    ///
    /// Column names are matched exactly, so "category" does not satisfy
    /// "Category".
    #[error("missing required column \"{0}\"")]
    MissingColumn(String),

    /// A date could not be parsed as a calendar date.
    ///
    /// `row` is the 1-based data row, not counting the header.
    #[error("could not parse \"{value}\" on row {row} as a date")]
    DateParse {
        /// The data row the date was found on.
        row: usize,
        /// The text that could not be parsed.
        value: String,
    },

    /// An amount could not be parsed as a number.
    #[error("could not parse \"{value}\" on row {row} as an amount")]
    InvalidAmount {
        /// The data row the amount was found on.
        row: usize,
        /// The text that could not be parsed.
        value: String,
    },

    /// There are no transactions to report on.
    #[error("the dataset has no transactions")]
    EmptyDataset,

    /// The delimited text could not be read, e.g. rows have a different number
    /// of fields to the header.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The spreadsheet could not be opened or has no worksheets.
    #[error("could not read the spreadsheet: {0}")]
    InvalidSpreadsheet(String),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// Could not acquire the session lock.
    #[error("could not acquire the session lock")]
    SessionLockError,

    /// The CSV export could not be written.
    #[error("could not write CSV export: {0}")]
    ExportError(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionLockError => InternalServerError::default().into_response(),
            Error::ExportError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                InternalServerError {
                    description: "Export Failed",
                    fix: "The CSV file could not be created. Please try again.",
                }
                .into_response()
            }
            // Load errors are user errors and are normally shown inline on the
            // dashboard. Anything reaching here is rendered as a bad request.
            error @ (Error::UnsupportedFormat(_)
            | Error::MissingColumn(_)
            | Error::DateParse { .. }
            | Error::InvalidAmount { .. }
            | Error::EmptyDataset
            | Error::InvalidCsv(_)
            | Error::InvalidSpreadsheet(_)
            | Error::MultipartError(_)) => {
                (StatusCode::BAD_REQUEST, error.alert().into_html()).into_response()
            }
        }
    }
}

impl Error {
    /// The message to show the user for this error.
    fn alert(&self) -> Alert {
        match self {
            Error::UnsupportedFormat(file_name) => Alert::Error {
                message: "Unsupported file format".to_owned(),
                details: format!(
                    "\"{file_name}\" is not a CSV (.csv) or Excel (.xlsx) file. \
                    Your previous data is still shown."
                ),
            },
            Error::MissingColumn(column) => Alert::Error {
                message: format!("Missing column \"{column}\""),
                details: format!(
                    "The file must have a header row with the columns {}. \
                    Column names are case-sensitive.",
                    REQUIRED_COLUMNS.join(", ")
                ),
            },
            Error::DateParse { row, value } => Alert::Error {
                message: "Invalid date".to_owned(),
                details: format!(
                    "Could not read \"{value}\" on row {row} as a date. \
                    Use a format like 2024-01-31."
                ),
            },
            Error::InvalidAmount { row, value } => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!("Could not read \"{value}\" on row {row} as a number."),
            },
            Error::EmptyDataset => Alert::Info {
                message: "No transactions".to_owned(),
                details: "The current data has no transactions. Upload a file with at least \
                    one row, or reset to the sample data."
                    .to_owned(),
            },
            Error::InvalidCsv(reason) => Alert::Error {
                message: "Could not read the CSV file".to_owned(),
                details: reason.to_owned(),
            },
            Error::InvalidSpreadsheet(reason) => Alert::Error {
                message: "Could not read the Excel file".to_owned(),
                details: reason.to_owned(),
            },
            Error::MultipartError(reason) => Alert::Error {
                message: "Upload failed".to_owned(),
                details: reason.to_owned(),
            },
            Error::SessionLockError | Error::ExportError(_) => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        }
    }
}
