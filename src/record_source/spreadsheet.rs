//! Reads transactions from the first worksheet of an Excel workbook.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};

use crate::{
    Error,
    record_source::{ColumnIndices, RawDate, RawRecord, parse_amount},
};

/// Parses the first worksheet of the `.xlsx` workbook in `bytes`.
///
/// The first row is the header. Rows where every cell is empty are skipped.
pub(super) fn read_xlsx(bytes: &[u8]) -> Result<Vec<RawRecord>, Error> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|error| Error::InvalidSpreadsheet(format!("could not open workbook: {error}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidSpreadsheet("the workbook has no worksheets".to_owned()))?
        .map_err(|error| Error::InvalidSpreadsheet(format!("could not read worksheet: {error}")))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let columns = ColumnIndices::locate(&header)?;

    rows.enumerate()
        .filter(|(_, row)| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|(index, row)| {
            let row_number = index + 1;
            let cell = |column: usize| row.get(column).unwrap_or(&Data::Empty);

            Ok(RawRecord {
                row: row_number,
                date: cell_date(cell(columns.date)),
                merchant: cell_text(cell(columns.merchant)),
                amount: cell_amount(row_number, cell(columns.amount))?,
                category: cell_text(cell(columns.category)),
            })
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            text.trim().to_owned()
        }
        Data::Float(number) => number.to_string(),
        Data::Int(number) => number.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(date_time) => date_time.as_f64().to_string(),
        _ => String::new(),
    }
}

fn cell_date(cell: &Data) -> RawDate {
    match cell {
        Data::DateTime(date_time) => RawDate::Serial(date_time.as_f64()),
        Data::Float(serial) => RawDate::Serial(*serial),
        Data::Int(serial) => RawDate::Serial(*serial as f64),
        other => RawDate::Text(cell_text(other)),
    }
}

fn cell_amount(row: usize, cell: &Data) -> Result<f64, Error> {
    match cell {
        Data::Float(amount) if amount.is_finite() => Ok(*amount),
        Data::Float(amount) => Err(Error::InvalidAmount {
            row,
            value: amount.to_string(),
        }),
        Data::Int(amount) => Ok(*amount as f64),
        other => parse_amount(row, &cell_text(other)),
    }
}
