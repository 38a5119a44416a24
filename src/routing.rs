//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::{get_dashboard_page, reset_dataset},
    endpoints,
    export::export_csv,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    upload::upload_transactions,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(
            endpoints::UPLOAD,
            post(upload_transactions).layer(upload_limit),
        )
        .route(endpoints::RESET, post(reset_dataset))
        .route(endpoints::EXPORT, get(export_csv))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}
