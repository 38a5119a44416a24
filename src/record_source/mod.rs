//! Reads raw transaction records from uploaded files.
//!
//! The file format is resolved once from the file name and the matching
//! reader is chosen with a `match` on [FileFormat]. Readers only locate the
//! required columns and read amounts; dates are left for the normalizer.

mod delimited;
mod spreadsheet;

use std::{fmt, path::Path};

use crate::Error;

/// The header names every uploaded file must have, in the order they are
/// checked.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Merchant", "Amount", "Category"];

/// The tabular formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma separated values with a header row (`.csv`).
    DelimitedText,
    /// The first worksheet of an Excel workbook (`.xlsx`).
    Spreadsheet,
}

impl FileFormat {
    /// Resolve the format from the extension of `file_name`.
    ///
    /// The extension is matched case-insensitively.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedFormat] if the extension is missing or is
    /// not `.csv` or `.xlsx`.
    pub fn from_file_name(file_name: &str) -> Result<Self, Error> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::DelimitedText),
            Some("xlsx") => Ok(FileFormat::Spreadsheet),
            _ => Err(Error::UnsupportedFormat(file_name.to_owned())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::DelimitedText => write!(f, "CSV"),
            FileFormat::Spreadsheet => write!(f, "Excel"),
        }
    }
}

/// A date as it was found in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// A date written as text, e.g. "2024-01-31".
    Text(String),
    /// A spreadsheet date serial number (days since 1899-12-30).
    Serial(f64),
}

/// A transaction row before its date has been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// The 1-based data row the record was read from, not counting the header.
    pub row: usize,
    pub date: RawDate,
    pub merchant: String,
    pub amount: f64,
    pub category: String,
}

/// Read the records in `bytes` using the reader for `format`.
///
/// A file with a header row and no data rows yields no records.
///
/// # Errors
/// Returns [Error::MissingColumn] if a required column is absent,
/// [Error::InvalidAmount] if an amount is not a number, or
/// [Error::InvalidCsv]/[Error::InvalidSpreadsheet] if the file cannot be read.
pub fn read_records(format: FileFormat, bytes: &[u8]) -> Result<Vec<RawRecord>, Error> {
    match format {
        FileFormat::DelimitedText => delimited::read_csv(bytes),
        FileFormat::Spreadsheet => spreadsheet::read_xlsx(bytes),
    }
}

/// Where the required columns are in a header row.
#[derive(Debug, PartialEq)]
struct ColumnIndices {
    date: usize,
    merchant: usize,
    amount: usize,
    category: usize,
}

impl ColumnIndices {
    fn locate(header: &[String]) -> Result<Self, Error> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.trim().trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| Error::MissingColumn(name.to_owned()))
        };

        let [date, merchant, amount, category] = REQUIRED_COLUMNS;

        Ok(Self {
            date: find(date)?,
            merchant: find(merchant)?,
            amount: find(amount)?,
            category: find(category)?,
        })
    }
}

/// Parse `text` as a finite amount. `NaN` and infinities are rejected.
fn parse_amount(row: usize, text: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::InvalidAmount {
            row,
            value: text.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{ColumnIndices, FileFormat, parse_amount};

    fn header(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|column| column.to_string()).collect()
    }

    #[test]
    fn resolves_format_from_extension() {
        assert_eq!(
            FileFormat::from_file_name("statement.csv"),
            Ok(FileFormat::DelimitedText)
        );
        assert_eq!(
            FileFormat::from_file_name("statement.xlsx"),
            Ok(FileFormat::Spreadsheet)
        );
        assert_eq!(
            FileFormat::from_file_name("STATEMENT.CSV"),
            Ok(FileFormat::DelimitedText)
        );
    }

    #[test]
    fn rejects_unsupported_extensions() {
        for file_name in ["statement.pdf", "statement.xls", "statement", "csv"] {
            assert_eq!(
                FileFormat::from_file_name(file_name),
                Err(Error::UnsupportedFormat(file_name.to_owned())),
                "{file_name} should be rejected"
            );
        }
    }

    #[test]
    fn locates_columns_in_any_order() {
        let columns =
            ColumnIndices::locate(&header(&["Category", "Notes", "Amount", "Date", "Merchant"]))
                .unwrap();

        assert_eq!(
            columns,
            ColumnIndices {
                date: 3,
                merchant: 4,
                amount: 2,
                category: 0,
            }
        );
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let result = ColumnIndices::locate(&header(&["Date", "Merchant", "Amount", "category"]));

        assert_eq!(result, Err(Error::MissingColumn("Category".to_owned())));
    }

    #[test]
    fn reports_first_missing_column() {
        let result = ColumnIndices::locate(&header(&["Amount", "Category"]));

        assert_eq!(result, Err(Error::MissingColumn("Date".to_owned())));
    }

    #[test]
    fn parse_amount_reports_row() {
        assert_eq!(parse_amount(1, " 12.5 "), Ok(12.5));
        assert_eq!(
            parse_amount(3, "twelve"),
            Err(Error::InvalidAmount {
                row: 3,
                value: "twelve".to_owned()
            })
        );
    }

    #[test]
    fn non_finite_amounts_are_invalid() {
        for text in ["NaN", "nan", "inf", "-inf", "infinity", "1e400"] {
            assert_eq!(
                parse_amount(1, text),
                Err(Error::InvalidAmount {
                    row: 1,
                    value: text.to_owned()
                }),
                "{text} should be rejected"
            );
        }
    }
}
