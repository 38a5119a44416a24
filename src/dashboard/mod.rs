//! Dashboard module
//!
//! Renders the dashboard page: a sidebar of sections and the selected
//! section's charts, tables or summary cards.

mod cards;
mod charts;
mod handlers;
mod navigator;
mod tables;

pub(crate) use handlers::dashboard_view;
pub use handlers::{get_dashboard_page, reset_dataset};
