//! Maps a dashboard section to the view that renders it.

use maud::{Markup, html};

use crate::{
    dashboard::{
        cards::summary_cards_view,
        charts::{DashboardChart, charts_view, monthly_spending_chart, yearly_spending_chart},
        tables::{category_tables, transactions_table},
    },
    navigation::Section,
    report::{ReportContext, summarize, transactions_by_category},
};

/// The element id of the notice shown in place of an empty chart or table.
const EMPTY_DATASET_NOTICE_ID: &str = "empty-dataset";

/// The rendered content of a section and the charts it needs initialized.
pub(super) struct SectionView {
    pub content: Markup,
    pub charts: Vec<DashboardChart>,
}

impl SectionView {
    fn without_charts(content: Markup) -> Self {
        Self {
            content,
            charts: Vec::new(),
        }
    }
}

/// Render `section` from the data in `context`.
///
/// Sections other than the overview show a notice instead of a chart or table
/// when there are no transactions.
pub(super) fn render_section(section: Section, context: &ReportContext) -> SectionView {
    if section != Section::Overview {
        if let Err(error) = context.ensure_not_empty() {
            return SectionView::without_charts(html!(
                (section_heading(heading(section)))
                (error.alert().into_html_with_id(EMPTY_DATASET_NOTICE_ID))
            ));
        }
    }

    match section {
        Section::Overview => overview(context),
        Section::MonthlySpending => {
            let chart = DashboardChart {
                id: "monthly-spending-chart",
                options: monthly_spending_chart(&context.aggregates().monthly).to_string(),
            };
            chart_section(section, chart)
        }
        Section::YearlySpending => {
            let chart = DashboardChart {
                id: "yearly-spending-chart",
                options: yearly_spending_chart(&context.aggregates().yearly).to_string(),
            };
            chart_section(section, chart)
        }
        Section::CategorySpending => {
            let groups = transactions_by_category(context.transactions());
            SectionView::without_charts(html!(
                (section_heading(heading(section)))
                (category_tables(&groups))
            ))
        }
        Section::RawData => SectionView::without_charts(html!(
            (section_heading(heading(section)))
            (transactions_table(context.transactions(), true))
        )),
    }
}

fn heading(section: Section) -> &'static str {
    match section {
        Section::Overview => "Overview of Your Spending",
        Section::CategorySpending => "Spending by Individual Categories",
        Section::MonthlySpending | Section::YearlySpending | Section::RawData => section.title(),
    }
}

fn section_heading(text: &str) -> Markup {
    html!(h2 class="text-2xl font-bold mb-4" { (text) })
}

fn overview(context: &ReportContext) -> SectionView {
    let summary = summarize(context.transactions(), context.aggregates());

    SectionView::without_charts(html!(
        (section_heading(heading(Section::Overview)))

        p class="text-gray-700 dark:text-gray-300" {
            "This dashboard provides insights into your credit card spending habits."
        }

        (summary_cards_view(&summary))
    ))
}

fn chart_section(section: Section, chart: DashboardChart) -> SectionView {
    let charts = vec![chart];

    SectionView {
        content: html!(
            (section_heading(heading(section)))
            (charts_view(&charts))
        ),
        charts,
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        navigation::Section,
        report::{DataSource, Dataset, ReportContext},
    };

    use super::render_section;

    fn sample_context() -> ReportContext {
        ReportContext::new(Dataset::sample())
    }

    fn empty_context() -> ReportContext {
        ReportContext::new(Dataset {
            source: DataSource::Sample,
            transactions: Vec::new(),
        })
    }

    fn heading_text(html: &Html) -> String {
        html.select(&Selector::parse("h2").unwrap())
            .next()
            .expect("no heading")
            .text()
            .collect()
    }

    #[test]
    fn each_section_has_its_heading() {
        let context = sample_context();
        let cases = [
            (Section::Overview, "Overview of Your Spending"),
            (Section::MonthlySpending, "Monthly Spending"),
            (Section::YearlySpending, "Yearly Spending"),
            (Section::CategorySpending, "Spending by Individual Categories"),
            (Section::RawData, "Raw Data"),
        ];

        for (section, want) in cases {
            let view = render_section(section, &context);
            let html = Html::parse_fragment(&view.content.into_string());

            assert_eq!(heading_text(&html), want);
        }
    }

    #[test]
    fn only_chart_sections_have_charts() {
        let context = sample_context();

        for section in Section::ALL {
            let view = render_section(section, &context);
            let want = matches!(section, Section::MonthlySpending | Section::YearlySpending);

            assert_eq!(!view.charts.is_empty(), want, "{section}");
        }
    }

    #[test]
    fn chart_container_matches_chart_id() {
        let view = render_section(Section::YearlySpending, &sample_context());
        let html = Html::parse_fragment(&view.content.into_string());

        let selector = Selector::parse(&format!("#{}", view.charts[0].id)).unwrap();
        assert!(html.select(&selector).next().is_some());
    }

    #[test]
    fn empty_dataset_shows_notice_instead_of_chart() {
        let context = empty_context();

        for section in [
            Section::MonthlySpending,
            Section::YearlySpending,
            Section::CategorySpending,
            Section::RawData,
        ] {
            let view = render_section(section, &context);
            let html = Html::parse_fragment(&view.content.into_string());

            assert!(view.charts.is_empty());
            assert!(
                html.select(&Selector::parse("#empty-dataset").unwrap())
                    .next()
                    .is_some(),
                "{section} should show the no transactions notice"
            );
            assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());
        }
    }

    #[test]
    fn empty_overview_still_renders() {
        let view = render_section(Section::Overview, &empty_context());
        let html = Html::parse_fragment(&view.content.into_string());

        assert!(
            html.select(&Selector::parse("#summary-cards").unwrap())
                .next()
                .is_some()
        );
    }
}
