//! Defines the core data model for credit card transactions and the built-in
//! sample dataset.

use time::{Date, macros::date};

/// A single spending event on a credit card statement.
///
/// Transactions are immutable once loaded and have no ID: a transaction is
/// identified by its position in the dataset it was loaded into.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// When the transaction happened.
    pub date: Date,
    /// Who was paid.
    pub merchant: String,
    /// The amount of money spent.
    pub amount: f64,
    /// The spending category, e.g. "Food" or "Travel".
    ///
    /// Categories are compared exactly, so "food" and "Food" are different
    /// categories.
    pub category: String,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(date: Date, merchant: &str, amount: f64, category: &str) -> Self {
        Self {
            date,
            merchant: merchant.to_owned(),
            amount,
            category: category.to_owned(),
        }
    }
}

/// The transactions shown to a session that has not uploaded its own data.
///
/// Twenty transactions spanning January 2023 to July 2024.
pub fn sample_transactions() -> Vec<Transaction> {
    [
        (date!(2023 - 01 - 15), "Amazon", 100.0, "Shopping"),
        (date!(2023 - 01 - 20), "Uber", 50.0, "Travel"),
        (date!(2023 - 02 - 05), "Netflix", 15.0, "Entertainment"),
        (date!(2023 - 02 - 18), "Dominos", 20.0, "Food"),
        (date!(2023 - 03 - 01), "Gym", 50.0, "Fitness"),
        (date!(2023 - 03 - 15), "Amazon", 200.0, "Shopping"),
        (date!(2023 - 03 - 25), "Uber", 40.0, "Travel"),
        (date!(2023 - 04 - 10), "Zomato", 60.0, "Food"),
        (date!(2023 - 05 - 05), "Starbucks", 10.0, "Food"),
        (date!(2023 - 05 - 15), "Uber", 45.0, "Travel"),
        (date!(2023 - 06 - 01), "Spotify", 7.0, "Entertainment"),
        (date!(2023 - 06 - 18), "Amazon", 300.0, "Shopping"),
        (date!(2024 - 01 - 10), "Flipkart", 150.0, "Shopping"),
        (date!(2024 - 01 - 25), "Big Bazaar", 100.0, "Groceries"),
        (date!(2024 - 02 - 08), "Hotstar", 12.0, "Entertainment"),
        (date!(2024 - 03 - 18), "Pizza Hut", 30.0, "Food"),
        (date!(2024 - 04 - 05), "Decathlon", 80.0, "Fitness"),
        (date!(2024 - 05 - 25), "Swiggy", 55.0, "Food"),
        (date!(2024 - 06 - 12), "MakeMyTrip", 500.0, "Travel"),
        (date!(2024 - 07 - 01), "BookMyShow", 25.0, "Entertainment"),
    ]
    .into_iter()
    .map(|(date, merchant, amount, category)| Transaction::new(date, merchant, amount, category))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::sample_transactions;

    #[test]
    fn sample_has_twenty_transactions() {
        assert_eq!(sample_transactions().len(), 20);
    }

    #[test]
    fn sample_total_is_1849() {
        let total: f64 = sample_transactions().iter().map(|t| t.amount).sum();

        assert_eq!(total, 1849.0);
    }

    #[test]
    fn sample_spans_2023_and_2024() {
        let transactions = sample_transactions();
        let count_2023 = transactions.iter().filter(|t| t.date.year() == 2023).count();
        let count_2024 = transactions.iter().filter(|t| t.date.year() == 2024).count();

        assert_eq!(count_2023, 12);
        assert_eq!(count_2024, 8);
    }
}
