//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying the dashboard and resetting to the sample data
//! - The page layout: sidebar, upload form, downloads and the current section

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    dashboard::{charts::charts_script, navigator::render_section},
    endpoints,
    export::ExportArtifact,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, ECHARTS_SCRIPT_URL, FORM_FILE_INPUT_STYLE,
        FORM_LABEL_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
    },
    navigation::{Section, SectionQuery, Sidebar},
    report::ReportContext,
    session::{SessionStore, get_or_create_session},
};

/// Display the dashboard page for the section in the query string.
pub async fn get_dashboard_page(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    Query(query): Query<SectionQuery>,
) -> Result<(CookieJar, Markup), Error> {
    let (jar, session_id) = get_or_create_session(jar);
    let context = ReportContext::new(sessions.dataset(session_id)?);

    Ok((jar, dashboard_view(query.section, &context, None)))
}

/// Go back to the sample data and show the section in the query string.
pub async fn reset_dataset(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    Query(query): Query<SectionQuery>,
) -> Result<(CookieJar, Redirect), Error> {
    let (jar, session_id) = get_or_create_session(jar);
    sessions.reset(session_id)?;
    tracing::info!("Session {session_id} reset to the sample data");

    Ok((jar, Redirect::to(&query.section.url())))
}

/// Renders the full dashboard page with `section` as the main content.
///
/// `alert` is shown above the section, e.g. the result of an upload.
pub(crate) fn dashboard_view(
    section: Section,
    context: &ReportContext,
    alert: Option<Alert>,
) -> Markup {
    let view = render_section(section, context);

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            aside class="w-full lg:w-64 shrink-0 lg:mr-8 mb-8 lg:mb-0 space-y-8"
            {
                (Sidebar::new(section).into_html())
                (upload_form(section))
                (downloads_view())
            }

            main id="dashboard-content" class="flex-1 min-w-0"
            {
                h1 class="text-3xl font-bold mb-2" { "Credit Card Spending Dashboard" }

                p id="data-source" class="text-sm text-gray-600 dark:text-gray-400 mb-6"
                {
                    "Showing: " (context.dataset().describe())
                }

                @if let Some(alert) = alert {
                    (alert.into_html())
                }

                (view.content)
            }
        }
    );

    let scripts = if view.charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(&view.charts),
        ]
    };

    base(section.title(), &scripts, &content)
}

fn upload_form(section: Section) -> Markup {
    html!(
        section id="upload"
        {
            h2 class="px-3 mb-3 text-lg font-semibold" { "Upload Your Credit Card Data" }

            form
                method="post"
                action=(endpoints::UPLOAD)
                enctype="multipart/form-data"
                class="px-3 space-y-3"
            {
                input type="hidden" name="section" value=(section.slug());

                div
                {
                    label for="file" class=(FORM_LABEL_STYLE) { "Upload a file (CSV or Excel)" }

                    input
                        type="file"
                        id="file"
                        name="file"
                        accept=".csv,.xlsx"
                        class=(FORM_FILE_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload" }
            }

            form
                method="post"
                action=(format!("{}?section={}", endpoints::RESET, section.slug()))
                class="px-3 mt-3"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Use Sample Data" }
            }
        }
    )
}

fn downloads_view() -> Markup {
    html!(
        section id="downloads"
        {
            h2 class="px-3 mb-3 text-lg font-semibold" { "Downloadable Reports" }

            ul class="px-3 space-y-2 text-sm"
            {
                @for artifact in ExportArtifact::ALL {
                    li
                    {
                        a href=(artifact.url()) class=(LINK_STYLE) download
                        {
                            (artifact.label())
                        }
                    }
                }
            }
        }
    )
}
