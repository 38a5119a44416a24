//! The upload form target: reads the chosen file and replaces the session's data.

use axum::{
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    Error,
    alert::Alert,
    dashboard::dashboard_view,
    navigation::Section,
    report::{Dataset, ReportContext},
    session::{SessionStore, get_or_create_session},
};

/// What happened to an upload.
#[derive(Debug, PartialEq)]
pub enum UploadOutcome {
    /// The form was submitted without choosing a file.
    NoFile,
    /// The file was read and its transactions replace the session's data.
    Loaded(Dataset),
    /// The file could not be read. The session keeps its data.
    Failed(Error),
}

struct UploadedFile {
    name: String,
    bytes: Bytes,
}

/// The fields of the upload form.
struct UploadForm {
    file: Option<UploadedFile>,
    section: Section,
}

impl UploadForm {
    fn into_outcome(self) -> UploadOutcome {
        match self.file {
            None => UploadOutcome::NoFile,
            Some(file) => match Dataset::from_upload(&file.name, &file.bytes) {
                Ok(dataset) => UploadOutcome::Loaded(dataset),
                Err(error) => UploadOutcome::Failed(error),
            },
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
    let mut form = UploadForm {
        file: None,
        section: Section::default(),
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_owned();

        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or_default().trim().to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty file part when no file was chosen.
                if !name.is_empty() {
                    tracing::debug!("Received file '{name}' that is {} bytes", bytes.len());
                    form.file = Some(UploadedFile { name, bytes });
                }
            }
            "section" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.section = text.parse().unwrap_or_else(|error| {
                    tracing::debug!("Ignoring unknown section in upload form: {error:?}");
                    Section::default()
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(error: MultipartError) -> Error {
    tracing::error!("Could not read multipart form: {error}");
    Error::MultipartError(error.body_text())
}

/// Load the uploaded file into the session and render the dashboard with the
/// result.
///
/// An upload that fails leaves the session's data as it was and responds with
/// 400 Bad Request.
pub async fn upload_transactions(
    State(sessions): State<SessionStore>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, Error> {
    let (jar, session_id) = get_or_create_session(jar);

    let (section, outcome) = match read_upload_form(multipart).await {
        Ok(form) => (form.section, form.into_outcome()),
        Err(error) => (Section::default(), UploadOutcome::Failed(error)),
    };

    let (status, alert) = match outcome {
        UploadOutcome::NoFile => {
            sessions.reset(session_id)?;

            (
                StatusCode::OK,
                Alert::Info {
                    message: "No file uploaded. Using sample data.".to_owned(),
                    details: String::new(),
                },
            )
        }
        UploadOutcome::Loaded(dataset) => {
            let count = dataset.transactions.len();
            let description = dataset.describe();
            sessions.replace(session_id, dataset)?;
            tracing::info!("Session {session_id} loaded {count} transactions from {description}");

            (
                StatusCode::OK,
                Alert::Success {
                    message: format!("Loaded {count} transactions"),
                    details: format!("Showing data from {description}."),
                },
            )
        }
        UploadOutcome::Failed(error) => {
            tracing::warn!("Upload for session {session_id} failed: {error}");

            (StatusCode::BAD_REQUEST, error.alert())
        }
    };

    let context = ReportContext::new(sessions.dataset(session_id)?);

    Ok((status, jar, dashboard_view(section, &context, Some(alert))).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::{FromRequest, Multipart, State},
        http::{Request, StatusCode},
        response::Response,
    };
    use axum_extra::extract::{CookieJar, cookie::Cookie};
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        endpoints,
        report::{DataSource, Dataset},
        session::{SESSION_COOKIE, SessionId, SessionStore},
        test_utils::{assert_content_type, assert_valid_html, parse_html_document},
        transaction::Transaction,
    };

    use super::upload_transactions;

    const BOUNDARY: &str = "MY_BOUNDARY123456789";

    /// A file part with `file_name` and `contents`, followed by the section field.
    async fn must_make_multipart(file_name: &str, contents: &[u8], section: &str) -> Multipart {
        let mut data = Vec::new();
        data.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        data.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        data.extend_from_slice(contents);
        data.extend_from_slice(format!("\r\n--{BOUNDARY}\r\n").as_bytes());
        data.extend_from_slice(b"Content-Disposition: form-data; name=\"section\"\r\n\r\n");
        data.extend_from_slice(section.as_bytes());
        data.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(endpoints::UPLOAD)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(data))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    fn store_with_dataset(session_id: SessionId, dataset: Dataset) -> SessionStore {
        let store = SessionStore::new();
        store.replace(session_id, dataset).unwrap();
        store
    }

    fn jar_for(session_id: SessionId) -> CookieJar {
        CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()))
    }

    fn single_transaction_dataset() -> Dataset {
        Dataset {
            source: DataSource::Sample,
            transactions: vec![Transaction::new(
                date!(2024 - 06 - 12),
                "MakeMyTrip",
                500.0,
                "Travel",
            )],
        }
    }

    async fn alert_text(response: Response) -> String {
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        html.select(&Selector::parse("#alert").unwrap())
            .next()
            .expect("no alert")
            .text()
            .collect()
    }

    #[tokio::test]
    async fn valid_csv_replaces_dataset() {
        let store = SessionStore::new();
        let session_id = SessionId::new();
        let csv = b"Date,Merchant,Amount,Category\n\
            2024-03-18,Pizza Hut,30,Food\n\
            2024-03-20,Uber,12.5,Travel\n";

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("march.csv", csv, "raw").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        let rows = html.select(&Selector::parse("main tbody tr").unwrap()).count();
        assert_eq!(rows, 2);
        let alert: String = html
            .select(&Selector::parse("#alert").unwrap())
            .next()
            .expect("no alert")
            .text()
            .collect();
        assert!(alert.contains("Loaded 2 transactions"), "{alert}");

        let dataset = store.dataset(session_id).unwrap();
        assert_eq!(dataset.transactions.len(), 2);
        assert_eq!(dataset.describe(), "march.csv (CSV)");
    }

    #[tokio::test]
    async fn missing_column_keeps_previous_dataset() {
        let session_id = SessionId::new();
        let store = store_with_dataset(session_id, single_transaction_dataset());
        let csv = b"Date,Merchant,Amount\n2024-03-18,Pizza Hut,30\n";

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("march.csv", csv, "overview").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let alert = alert_text(response).await;
        assert!(alert.contains("Missing column \"Category\""), "{alert}");
        assert_eq!(
            store.dataset(session_id).unwrap(),
            single_transaction_dataset()
        );
    }

    #[tokio::test]
    async fn unsupported_format_shows_error() {
        let session_id = SessionId::new();
        let store = SessionStore::new();

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("statement.pdf", b"%PDF-1.4", "overview").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let alert = alert_text(response).await;
        assert!(alert.contains("Unsupported file format"), "{alert}");
        assert_eq!(store.dataset(session_id).unwrap(), Dataset::sample());
    }

    #[tokio::test]
    async fn no_file_resets_to_sample() {
        let session_id = SessionId::new();
        let store = store_with_dataset(session_id, single_transaction_dataset());

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("", b"", "monthly").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        let alert: String = html
            .select(&Selector::parse("#alert").unwrap())
            .next()
            .expect("no alert")
            .text()
            .collect();
        assert!(
            alert.contains("No file uploaded. Using sample data."),
            "{alert}"
        );
        assert!(
            html.select(&Selector::parse("#monthly-spending-chart").unwrap())
                .next()
                .is_some(),
            "want the submitted section to be shown"
        );
        assert_eq!(store.dataset(session_id).unwrap(), Dataset::sample());
    }

    #[tokio::test]
    async fn header_only_file_loads_empty_dataset() {
        let session_id = SessionId::new();
        let store = SessionStore::new();

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("empty.csv", b"Date,Merchant,Amount,Category\n", "yearly").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html: Html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("#yearly-spending-chart").unwrap())
                .next()
                .is_none()
        );
        let alerts: Vec<String> = html
            .select(&Selector::parse("#alert").unwrap())
            .map(|alert| alert.text().collect())
            .collect();
        assert_eq!(alerts.len(), 1, "want one page alert, got {alerts:?}");
        assert!(alerts[0].contains("Loaded 0 transactions"), "{alerts:?}");
        assert_eq!(
            html.select(&Selector::parse("#empty-dataset").unwrap()).count(),
            1
        );
        assert!(store.dataset(session_id).unwrap().transactions.is_empty());
    }

    #[tokio::test]
    async fn spreadsheet_upload_is_loaded() {
        let session_id = SessionId::new();
        let store = SessionStore::new();
        let bytes = include_bytes!("../tests/fixtures/transactions.xlsx");

        let response = upload_transactions(
            State(store.clone()),
            jar_for(session_id),
            must_make_multipart("transactions.xlsx", bytes, "raw").await,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let transactions = store.dataset(session_id).unwrap().transactions;
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[1].date, date!(2023 - 01 - 20));
    }
}
