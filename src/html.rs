use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

/// Tailwind's play CDN, which generates the styles used in the page at load time.
pub const TAILWIND_SCRIPT_URL: &str = "https://cdn.tailwindcss.com";
/// ECharts, for rendering the chart options produced by `charming`.
pub const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2 px-4 text-sm font-medium \
    text-gray-900 bg-white rounded border border-gray-200 hover:bg-gray-100 \
    hover:text-blue-700 dark:bg-gray-800 dark:text-gray-400 \
    dark:border-gray-600 dark:hover:text-white dark:hover:bg-gray-700";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_FILE_INPUT_STYLE: &str = "block w-full text-sm text-gray-900 \
    border border-gray-300 rounded cursor-pointer bg-gray-50 \
    dark:text-gray-400 dark:bg-gray-700 dark:border-gray-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col lg:flex-row px-6 py-8 mx-auto lg:py-10 max-w-screen-xl text-gray-900 dark:text-white";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spending Dashboard" }

                script src=(TAILWIND_SCRIPT_URL) {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// Format `number` as dollars with two decimal places, e.g. "-$12.50".
pub fn format_currency(number: f64) -> String {
    static FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let magnitude = number.abs();
    let digits = match formatter {
        // Zero is hardcoded as "0" by numfmt.
        Some(formatter) if magnitude > 0.0 => formatter.fmt_string(magnitude),
        _ => format!("${magnitude:.2}"),
    };
    let digits = pad_cents(digits);

    if number < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// numfmt drops trailing zeros after the decimal point, e.g. "12.30" is
/// rendered as "12.3" and "12.00" as "12".
fn pad_cents(formatted: String) -> String {
    match formatted.rsplit_once('.') {
        None => format!("{formatted}.00"),
        Some((_, cents)) if cents.len() == 1 => format!("{formatted}0"),
        Some(_) => formatted,
    }
}
