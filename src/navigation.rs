//! The dashboard sections and the sidebar for moving between them.

use std::{fmt, str::FromStr};

use maud::{Markup, html};
use serde::Deserialize;

use crate::endpoints;

/// A page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Section {
    /// Headline numbers for the whole dataset.
    #[default]
    #[serde(rename = "overview")]
    Overview,
    /// A line chart of the total spent each month.
    #[serde(rename = "monthly")]
    MonthlySpending,
    /// A bar chart of the total spent each year.
    #[serde(rename = "yearly")]
    YearlySpending,
    /// A table of transactions for each category.
    #[serde(rename = "category")]
    CategorySpending,
    /// A table of every transaction.
    #[serde(rename = "raw")]
    RawData,
}

impl Section {
    /// Every section, in sidebar order.
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::MonthlySpending,
        Section::YearlySpending,
        Section::CategorySpending,
        Section::RawData,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::MonthlySpending => "Monthly Spending",
            Section::YearlySpending => "Yearly Spending",
            Section::CategorySpending => "Category Spending",
            Section::RawData => "Raw Data",
        }
    }

    /// The value of the `section` query parameter for this section.
    pub fn slug(self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::MonthlySpending => "monthly",
            Section::YearlySpending => "yearly",
            Section::CategorySpending => "category",
            Section::RawData => "raw",
        }
    }

    pub fn url(self) -> String {
        format!("{}?section={}", endpoints::ROOT, self.slug())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The slug did not name a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.slug() == s)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

/// The query string of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct SectionQuery {
    /// Defaults to [Section::Overview] when the parameter is missing.
    #[serde(default)]
    pub section: Section,
}

/// A link in the sidebar.
///
/// It will change appearance if `is_current` is set to `true`.
#[derive(Clone)]
struct Link {
    section: Section,
    is_current: bool,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block rounded-lg px-3 py-2 font-semibold text-blue-700 bg-blue-50 \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
            hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 \
            dark:hover:text-blue-200"
        };

        html!(
            a
                href=(self.section.url())
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.section.title())
            }
        )
    }
}

/// The list of sections shown beside the dashboard content.
pub struct Sidebar {
    links: Vec<Link>,
}

impl Sidebar {
    /// Get the sidebar with the link for `active_section` marked as current.
    pub fn new(active_section: Section) -> Self {
        let links = Section::ALL
            .into_iter()
            .map(|section| Link {
                section,
                is_current: section == active_section,
            })
            .collect();

        Self { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav
                id="sidebar"
                aria-label="Sections"
                class="w-full lg:w-56 shrink-0 mb-6 lg:mb-0 lg:mr-8"
            {
                h2 class="px-3 mb-3 text-lg font-semibold text-gray-900 dark:text-white"
                {
                    "Navigation"
                }

                ul class="flex flex-col gap-1 text-sm font-medium"
                {
                    @for link in self.links {
                        li { (link.into_html()) }
                    }
                }
            }
        )
    }
}
