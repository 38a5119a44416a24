//! Alert system for displaying success, info and error messages to users.

use maud::{Markup, html};

/// A message shown above the dashboard content.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something the user asked for worked.
    Success { message: String, details: String },
    /// Something the user should know about, but that is not an error.
    Info { message: String, details: String },
    /// Something the user asked for failed.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the page-level alert, with the id `alert`.
    pub fn into_html(self) -> Markup {
        self.into_html_with_id("alert")
    }

    /// Render the alert with the element id `id`, for messages shown inside
    /// a section alongside the page-level alert.
    pub fn into_html_with_id(self, id: &str) -> Markup {
        let (container_style, role, message, details) = match self {
            Alert::Success { message, details } => (
                "text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "status",
                message,
                details,
            ),
            Alert::Info { message, details } => (
                "text-blue-800 border-blue-300 bg-blue-50 \
                dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800",
                "status",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "alert",
                message,
                details,
            ),
        };

        html!(
            div
                id=(id)
                role=(role)
                class={"w-full p-4 mb-4 border rounded-lg " (container_style)}
            {
                p class="font-semibold" { (message) }

                @if !details.is_empty() {
                    p class="text-sm" { (details) }
                }
            }
        )
    }
}
