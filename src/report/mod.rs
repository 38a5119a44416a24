//! The data a report is built from: a session's dataset and its aggregates.

mod aggregation;

use crate::{
    Error,
    normalize::normalize,
    record_source::{FileFormat, read_records},
    transaction::{Transaction, sample_transactions},
};

pub use aggregation::{
    Aggregates, CategoryAggregate, MonthlyAggregate, SummaryStatistics, YearMonth,
    YearlyAggregate, aggregate, summarize, transactions_by_category,
};

/// Where a dataset's transactions came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// The built-in sample transactions.
    Sample,
    /// A file uploaded by the user.
    Upload {
        file_name: String,
        format: FileFormat,
    },
}

/// The transactions a session is looking at.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source: DataSource,
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    /// The built-in sample transactions.
    pub fn sample() -> Self {
        Self {
            source: DataSource::Sample,
            transactions: sample_transactions(),
        }
    }

    /// Load a dataset from the contents of an uploaded file.
    ///
    /// The format is chosen from the extension of `file_name`.
    ///
    /// # Errors
    /// Returns an error if the format is unsupported, a required column is
    /// missing or a row cannot be read. See [Error] for the variants.
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Result<Self, Error> {
        let format = FileFormat::from_file_name(file_name)?;
        let records = read_records(format, bytes)?;
        let transactions = normalize(records)?;

        tracing::debug!(
            "Loaded {} transactions from {format} file '{file_name}' ({} bytes)",
            transactions.len(),
            bytes.len()
        );

        Ok(Self {
            source: DataSource::Upload {
                file_name: file_name.to_owned(),
                format,
            },
            transactions,
        })
    }

    /// A short description of where the data came from, e.g. for a page subtitle.
    pub fn describe(&self) -> String {
        match &self.source {
            DataSource::Sample => "Sample data".to_owned(),
            DataSource::Upload { file_name, format } => format!("{file_name} ({format})"),
        }
    }
}

/// Everything needed to render a section or an export for one request.
///
/// The aggregates are computed when the context is created and are never
/// shared between requests.
#[derive(Debug, Clone)]
pub struct ReportContext {
    dataset: Dataset,
    aggregates: Aggregates,
}

impl ReportContext {
    pub fn new(dataset: Dataset) -> Self {
        let aggregates = aggregate(&dataset.transactions);

        Self {
            dataset,
            aggregates,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.dataset.transactions
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// # Errors
    /// Returns [Error::EmptyDataset] if there are no transactions to report on.
    pub fn ensure_not_empty(&self) -> Result<(), Error> {
        if self.dataset.transactions.is_empty() {
            Err(Error::EmptyDataset)
        } else {
            Ok(())
        }
    }
}
