//! Monthly, yearly and per category totals of transaction amounts.
//!
//! Every function here is pure: the same transactions always give the same
//! totals, and nothing is cached between requests.

use std::{collections::BTreeMap, fmt};

use time::Date;

use crate::transaction::Transaction;

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month of the year, from 1 to 12.
    pub month: u8,
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub month: YearMonth,
    pub total: f64,
}

/// The total spent in one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub year: i32,
    pub total: f64,
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: f64,
}

/// The three groupings of a set of transactions.
///
/// Within each grouping the buckets partition the transactions: every
/// transaction is counted in exactly one bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    /// One entry per month that has transactions, oldest first.
    pub monthly: Vec<MonthlyAggregate>,
    /// One entry per year that has transactions, oldest first.
    pub yearly: Vec<YearlyAggregate>,
    /// One entry per distinct category, sorted by name.
    pub by_category: Vec<CategoryAggregate>,
}

/// Compute the monthly, yearly and per category totals of `transactions`.
pub fn aggregate(transactions: &[Transaction]) -> Aggregates {
    let mut monthly: BTreeMap<YearMonth, f64> = BTreeMap::new();
    let mut yearly: BTreeMap<i32, f64> = BTreeMap::new();
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();

    for transaction in transactions {
        *monthly.entry(YearMonth::from(transaction.date)).or_default() += transaction.amount;
        *yearly.entry(transaction.date.year()).or_default() += transaction.amount;
        *by_category.entry(&transaction.category).or_default() += transaction.amount;
    }

    Aggregates {
        monthly: monthly
            .into_iter()
            .map(|(month, total)| MonthlyAggregate { month, total })
            .collect(),
        yearly: yearly
            .into_iter()
            .map(|(year, total)| YearlyAggregate { year, total })
            .collect(),
        by_category: by_category
            .into_iter()
            .map(|(category, total)| CategoryAggregate {
                category: category.to_owned(),
                total,
            })
            .collect(),
    }
}

/// Group `transactions` by category name.
///
/// Categories are sorted by name and the transactions within a category keep
/// the order they were loaded in.
pub fn transactions_by_category(transactions: &[Transaction]) -> Vec<(&str, Vec<&Transaction>)> {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();

    for transaction in transactions {
        groups
            .entry(&transaction.category)
            .or_default()
            .push(transaction);
    }

    groups.into_iter().collect()
}

/// Headline numbers for the overview section.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub total_spent: f64,
    pub transaction_count: usize,
    /// The earliest and latest transaction dates, if there are any transactions.
    pub date_range: Option<(Date, Date)>,
    /// The total divided by the number of months that have transactions.
    pub monthly_average: f64,
    /// The category with the largest total. Ties go to the name sorted first.
    pub top_category: Option<CategoryAggregate>,
}

/// Summarise `transactions` using their precomputed `aggregates`.
pub fn summarize(transactions: &[Transaction], aggregates: &Aggregates) -> SummaryStatistics {
    let total_spent = transactions.iter().map(|transaction| transaction.amount).sum();

    let first = transactions.iter().map(|transaction| transaction.date).min();
    let last = transactions.iter().map(|transaction| transaction.date).max();

    let monthly_average = if aggregates.monthly.is_empty() {
        0.0
    } else {
        total_spent / aggregates.monthly.len() as f64
    };

    let top_category = aggregates
        .by_category
        .iter()
        .fold(None::<&CategoryAggregate>, |top, candidate| match top {
            Some(top) if top.total >= candidate.total => Some(top),
            _ => Some(candidate),
        })
        .cloned();

    SummaryStatistics {
        total_spent,
        transaction_count: transactions.len(),
        date_range: first.zip(last),
        monthly_average,
        top_category,
    }
}
