//! Reads transactions from comma separated values.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    Error,
    record_source::{ColumnIndices, RawDate, RawRecord, parse_amount},
};

/// Parses CSV data with a header row containing at least the required columns.
///
/// Extra columns are ignored. Blank lines are skipped.
pub(super) fn read_csv(bytes: &[u8]) -> Result<Vec<RawRecord>, Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?
        .iter()
        .map(str::to_owned)
        .collect();
    let columns = ColumnIndices::locate(&header)?;

    reader
        .records()
        .enumerate()
        .map(|(index, record)| {
            let record = record.map_err(|error| Error::InvalidCsv(error.to_string()))?;
            to_raw_record(index + 1, &record, &columns)
        })
        .collect()
}

fn to_raw_record(
    row: usize,
    record: &StringRecord,
    columns: &ColumnIndices,
) -> Result<RawRecord, Error> {
    let field = |index: usize| record.get(index).unwrap_or_default();

    Ok(RawRecord {
        row,
        date: RawDate::Text(field(columns.date).to_owned()),
        merchant: field(columns.merchant).to_owned(),
        amount: parse_amount(row, field(columns.amount))?,
        category: field(columns.category).to_owned(),
    })
}
