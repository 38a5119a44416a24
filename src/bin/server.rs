use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spending_dashboard::{AppState, DashboardConfig, build_router, graceful_shutdown};

/// The web server for the credit card spending dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address to serve the dashboard from.
    #[arg(long, env = "DASHBOARD_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "DASHBOARD_PORT", default_value_t = 3000)]
    port: u16,

    /// The largest file that can be uploaded, in bytes.
    #[arg(
        long,
        env = "DASHBOARD_MAX_UPLOAD_BYTES",
        default_value_t = DashboardConfig::default().max_upload_bytes
    )]
    max_upload_bytes: usize,

    /// Minutes of inactivity after which a session's upload is discarded.
    #[arg(
        long,
        env = "DASHBOARD_SESSION_IDLE_MINUTES",
        default_value_t = DashboardConfig::default().session_idle_timeout.as_secs() / 60
    )]
    session_idle_minutes: u64,

    /// Write debug logs to this file in addition to stdout.
    #[arg(long, env = "DASHBOARD_LOG_PATH")]
    log_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_path.as_ref());

    let addr = SocketAddr::from((args.host, args.port));
    let state = AppState::new(DashboardConfig {
        max_upload_bytes: args.max_upload_bytes,
        session_idle_timeout: Duration::from_secs(args.session_idle_minutes.saturating_mul(60)),
    });

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on http://{addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server");
}

fn setup_logging(log_path: Option<&PathBuf>) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = log_path.map(|path| {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Could not create log file");

        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(false)
            .with_writer(Arc::new(log_file))
            .with_filter(filter::LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
