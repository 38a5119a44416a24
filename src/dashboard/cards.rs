//! Summary cards for the overview section.

use maud::{Markup, html};

use crate::{html::format_currency, report::SummaryStatistics};

/// Renders a grid of cards with the headline numbers in `summary`.
pub(super) fn summary_cards_view(summary: &SummaryStatistics) -> Markup {
    let date_range = summary
        .date_range
        .map(|(first, last)| format!("{first} to {last}"))
        .unwrap_or_else(|| "No transactions".to_owned());

    html! {
        section
            id="summary-cards"
            class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full mt-6"
        {
            (card("Total Spent", &format_currency(summary.total_spent), &date_range))
            (card(
                "Transactions",
                &summary.transaction_count.to_string(),
                "Rows in the current data",
            ))
            (card(
                "Monthly Average",
                &format_currency(summary.monthly_average),
                "Per month with spending",
            ))

            @match &summary.top_category {
                Some(top) => {
                    (card("Top Category", &top.category, &format_currency(top.total)))
                }
                None => {
                    (card("Top Category", "None", ""))
                }
            }
        }
    }
}

fn card(title: &str, value: &str, caption: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
            aria-label=(title)
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-2" {
                (title)
            }

            div class="text-3xl font-bold mb-1 truncate" title=(value) {
                (value)
            }

            @if !caption.is_empty() {
                div class="text-sm text-gray-600 dark:text-gray-400" {
                    (caption)
                }
            }
        }
    }
}
