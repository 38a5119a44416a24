//! Chart generation and rendering for the dashboard.
//!
//! Charts are generated as JSON configuration for the ECharts library and
//! rendered with an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Label,
        LabelPosition, Symbol, Tooltip, Trigger,
    },
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    report::{MonthlyAggregate, YearlyAggregate},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The x-axis labels ("YYYY-MM") and totals for the monthly chart.
pub(super) fn monthly_series(monthly: &[MonthlyAggregate]) -> (Vec<String>, Vec<f64>) {
    monthly
        .iter()
        .map(|row| (row.month.to_string(), row.total))
        .unzip()
}

/// The x-axis labels (the year) and totals for the yearly chart.
pub(super) fn yearly_series(yearly: &[YearlyAggregate]) -> (Vec<String>, Vec<f64>) {
    yearly
        .iter()
        .map(|row| (row.year.to_string(), row.total))
        .unzip()
}

/// A line chart of the total spent each month, one point per month.
pub(super) fn monthly_spending_chart(monthly: &[MonthlyAggregate]) -> Chart {
    let (labels, values) = monthly_series(monthly);

    Chart::new()
        .title(Title::new().text("Monthly Spending"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Month")
                .axis_label(AxisLabel::new().rotate(45))
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Amount")
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Amount")
                .symbol(Symbol::Circle)
                .symbol_size(8)
                .item_style(ItemStyle::new().color("skyblue"))
                .data(values),
        )
}

/// A bar chart with one bar per year, each labelled with its total.
pub(super) fn yearly_spending_chart(yearly: &[YearlyAggregate]) -> Chart {
    let (labels, values) = yearly_series(yearly);

    Chart::new()
        .title(Title::new().text("Yearly Spending"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Year")
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Amount")
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Amount")
                .label(Label::new().show(true).position(LabelPosition::Top))
                .item_style(ItemStyle::new().color("teal"))
                .data(values),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{report::aggregate, transaction::sample_transactions};

    use super::{monthly_series, monthly_spending_chart, yearly_series, yearly_spending_chart};

    #[test]
    fn sample_yearly_series_has_two_bars() {
        let aggregates = aggregate(&sample_transactions());

        let (labels, values) = yearly_series(&aggregates.yearly);

        assert_eq!(labels, ["2023", "2024"]);
        assert_eq!(values, [897.0, 952.0]);
    }

    #[test]
    fn monthly_series_uses_year_month_labels() {
        let aggregates = aggregate(&sample_transactions());

        let (labels, values) = monthly_series(&aggregates.monthly);

        assert_eq!(labels.len(), values.len());
        assert_eq!(labels[0], "2023-01");
        assert_eq!(values[0], 150.0);
    }

    #[test]
    fn chart_options_name_their_series_type() {
        let aggregates = aggregate(&sample_transactions());

        let monthly = monthly_spending_chart(&aggregates.monthly).to_string();
        let yearly = yearly_spending_chart(&aggregates.yearly).to_string();

        assert!(monthly.contains("\"line\""), "{monthly}");
        assert!(monthly.contains("\"circle\""), "{monthly}");
        assert!(yearly.contains("\"bar\""), "{yearly}");
        assert!(yearly.contains("\"2024\""), "{yearly}");
    }
}
