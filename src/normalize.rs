//! Converts raw records into transactions with calendar dates.

use time::{
    Date, Duration, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::{date, format_description},
};

use crate::{
    Error,
    record_source::{RawDate, RawRecord},
    transaction::Transaction,
};

/// Day zero for spreadsheet date serial numbers.
const SERIAL_EPOCH: Date = date!(1899 - 12 - 30);

/// Serials further than this from the epoch are outside the range of [Date].
const MAX_SERIAL_DAYS: f64 = 10_000_000.0;

const DATE_FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
];

const DATE_TIME_FORMATS: [&[BorrowedFormatItem<'static>]; 2] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
];

/// Convert `records` into transactions, keeping their order.
///
/// Text fields are trimmed. Every record produces exactly one transaction.
///
/// # Errors
/// Returns [Error::DateParse] for the first record whose date cannot be read,
/// with the row the record was read from.
pub fn normalize(records: Vec<RawRecord>) -> Result<Vec<Transaction>, Error> {
    records
        .into_iter()
        .map(|record| {
            let date = parse_date(&record.date).ok_or_else(|| Error::DateParse {
                row: record.row,
                value: describe_raw_date(&record.date),
            })?;

            Ok(Transaction::new(
                date,
                record.merchant.trim(),
                record.amount,
                record.category.trim(),
            ))
        })
        .collect()
}

/// Read a calendar date from `raw`, or `None` if it is not a recognised date.
///
/// Text is tried against ISO dates (`2024-01-31`), slash separated dates with
/// the year first (`2024/01/31`) or month first (`01/31/2024`), and ISO date
/// times whose time is discarded. Serial numbers count days from 1899-12-30
/// and any fraction of a day is dropped.
pub fn parse_date(raw: &RawDate) -> Option<Date> {
    match raw {
        RawDate::Text(text) => parse_date_text(text.trim()),
        RawDate::Serial(serial) => date_from_serial(*serial),
    }
}

fn parse_date_text(text: &str) -> Option<Date> {
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(text, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS.iter().find_map(|format| {
                PrimitiveDateTime::parse(text, format)
                    .ok()
                    .map(|date_time| date_time.date())
            })
        })
}

fn date_from_serial(serial: f64) -> Option<Date> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }

    SERIAL_EPOCH.checked_add(Duration::days(serial.floor() as i64))
}

fn describe_raw_date(raw: &RawDate) -> String {
    match raw {
        RawDate::Text(text) => text.clone(),
        RawDate::Serial(serial) => serial.to_string(),
    }
}
