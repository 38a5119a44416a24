//! CSV downloads of the raw transactions and their aggregates.

use std::fmt;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::{
    Error, endpoints,
    endpoints::format_endpoint,
    record_source::REQUIRED_COLUMNS,
    report::{Aggregates, ReportContext},
    session::{SessionStore, get_or_create_session},
    transaction::Transaction,
};

/// A downloadable CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportArtifact {
    /// Every transaction.
    Raw,
    /// The monthly, yearly and category totals in one file.
    Aggregated,
    Monthly,
    Yearly,
    Category,
}

impl ExportArtifact {
    /// Every artifact, in the order they are listed on the page.
    pub const ALL: [ExportArtifact; 5] = [
        ExportArtifact::Raw,
        ExportArtifact::Aggregated,
        ExportArtifact::Monthly,
        ExportArtifact::Yearly,
        ExportArtifact::Category,
    ];

    fn slug(self) -> &'static str {
        match self {
            ExportArtifact::Raw => "raw",
            ExportArtifact::Aggregated => "aggregated",
            ExportArtifact::Monthly => "monthly",
            ExportArtifact::Yearly => "yearly",
            ExportArtifact::Category => "category",
        }
    }

    pub fn file_name(self) -> String {
        format!("credit_card_{}_data.csv", self.slug())
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportArtifact::Raw => "Download Raw Data CSV",
            ExportArtifact::Aggregated => "Download Aggregated Data CSV",
            ExportArtifact::Monthly => "Download Monthly Totals CSV",
            ExportArtifact::Yearly => "Download Yearly Totals CSV",
            ExportArtifact::Category => "Download Category Totals CSV",
        }
    }

    pub fn url(self) -> String {
        format_endpoint(endpoints::EXPORT, self.slug())
    }

    /// The CSV text of this artifact for the data in `context`.
    ///
    /// # Errors
    /// Returns [Error::ExportError] if the CSV could not be written.
    pub fn render(self, context: &ReportContext) -> Result<String, Error> {
        let aggregates = context.aggregates();

        match self {
            ExportArtifact::Raw => raw_csv(context.transactions()),
            ExportArtifact::Aggregated => aggregated_csv(aggregates),
            ExportArtifact::Monthly => write_csv(
                &MONTHLY_HEADER,
                aggregates.monthly.iter().map(|row| TotalRow {
                    key: row.month.to_string(),
                    amount: row.total,
                }),
            ),
            ExportArtifact::Yearly => write_csv(
                &YEARLY_HEADER,
                aggregates.yearly.iter().map(|row| TotalRow {
                    key: row.year,
                    amount: row.total,
                }),
            ),
            ExportArtifact::Category => write_csv(
                &CATEGORY_HEADER,
                aggregates.by_category.iter().map(|row| TotalRow {
                    key: row.category.as_str(),
                    amount: row.total,
                }),
            ),
        }
    }
}

const AGGREGATED_HEADER: [&str; 3] = ["Grouping", "Key", "Total"];
const MONTHLY_HEADER: [&str; 2] = ["Month", "Amount"];
const YEARLY_HEADER: [&str; 2] = ["Year", "Amount"];
const CATEGORY_HEADER: [&str; 2] = ["Category", "Amount"];

#[derive(Serialize)]
struct RawRow<'a> {
    date: String,
    merchant: &'a str,
    amount: f64,
    category: &'a str,
}

#[derive(Serialize)]
struct AggregateRow {
    grouping: &'static str,
    key: String,
    total: f64,
}

#[derive(Serialize)]
struct TotalRow<K> {
    key: K,
    amount: f64,
}

/// Write `transactions` as CSV with the columns `Date,Merchant,Amount,Category`.
///
/// Dates are written as `YYYY-MM-DD` so the file can be uploaded again.
///
/// # Errors
/// Returns [Error::ExportError] if the CSV could not be written.
pub fn raw_csv(transactions: &[Transaction]) -> Result<String, Error> {
    write_csv(
        &REQUIRED_COLUMNS,
        transactions.iter().map(|transaction| RawRow {
            date: transaction.date.to_string(),
            merchant: &transaction.merchant,
            amount: transaction.amount,
            category: &transaction.category,
        }),
    )
}

/// Write every aggregate as CSV in long format with the columns
/// `Grouping,Key,Total`.
///
/// The grouping is one of `Month`, `Year` or `Category`.
///
/// # Errors
/// Returns [Error::ExportError] if the CSV could not be written.
pub fn aggregated_csv(aggregates: &Aggregates) -> Result<String, Error> {
    let monthly = aggregates.monthly.iter().map(|row| AggregateRow {
        grouping: "Month",
        key: row.month.to_string(),
        total: row.total,
    });
    let yearly = aggregates.yearly.iter().map(|row| AggregateRow {
        grouping: "Year",
        key: row.year.to_string(),
        total: row.total,
    });
    let by_category = aggregates.by_category.iter().map(|row| AggregateRow {
        grouping: "Category",
        key: row.category.clone(),
        total: row.total,
    });

    write_csv(&AGGREGATED_HEADER, monthly.chain(yearly).chain(by_category))
}

/// Write `header` and then each of `rows`.
///
/// The header is written even if there are no rows.
fn write_csv<T: Serialize>(
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(header).map_err(export_error)?;

    for row in rows {
        writer.serialize(row).map_err(export_error)?;
    }

    let bytes = writer.into_inner().map_err(export_error)?;

    String::from_utf8(bytes).map_err(export_error)
}

fn export_error(error: impl fmt::Display) -> Error {
    Error::ExportError(error.to_string())
}

/// Download an [ExportArtifact] built from the session's current data.
pub async fn export_csv(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    Path(artifact): Path<ExportArtifact>,
) -> Result<Response, Error> {
    let (jar, session_id) = get_or_create_session(jar);
    let context = ReportContext::new(sessions.dataset(session_id)?);

    let body = artifact
        .render(&context)
        .inspect_err(|error| tracing::error!("could not export {artifact:?}: {error}"))?;

    Ok((
        jar,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name()),
            ),
        ],
        body,
    )
        .into_response())
}
