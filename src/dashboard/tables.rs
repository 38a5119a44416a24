//! Table views for the category and raw data sections.

use maud::{Markup, html};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::Transaction,
};

/// Renders a table of `transactions` in the order given.
///
/// The category column is only shown if `show_category` is `true`, since the
/// per category tables already name the category in their heading.
pub(super) fn transactions_table<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    show_category: bool,
) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow mb-6" {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Merchant" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        @if show_category {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        }
                    }
                }
                tbody {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) {
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                (transaction.date.to_string())
                            }
                            td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                (transaction.merchant)
                            }
                            td class={(TABLE_CELL_STYLE) " text-right"} {
                                (format_currency(transaction.amount))
                            }
                            @if show_category {
                                td class=(TABLE_CELL_STYLE) { (transaction.category) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one table per category, each headed "<Category> Spending".
pub(super) fn category_tables(groups: &[(&str, Vec<&Transaction>)]) -> Markup {
    html! {
        @for (category, transactions) in groups {
            section class="w-full" {
                h3 class="text-xl font-semibold mb-4" { (category) " Spending" }

                (transactions_table(transactions.iter().copied(), false))
            }
        }
    }
}
